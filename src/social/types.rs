//! 社媒领域类型：凭证、设备指纹、会话、标签、帖子快照
//!
//! 所有类型均为只读快照或由 SessionManager 独占持有的状态；
//! MediaItem 带双重 id（公开 id 用于动作下发，pk 用于详情拉取）。

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::EngageError;

/// 账号凭证：从进程环境变量读取，运行期内不可变
#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// 从 SPROUT_USERNAME / SPROUT_PASSWORD 读取；缺失视为配置错误（而非认证错误）
    pub fn from_env() -> Result<Self, EngageError> {
        let username = std::env::var("SPROUT_USERNAME")
            .map_err(|_| EngageError::Config("SPROUT_USERNAME is not set".to_string()))?;
        let password = std::env::var("SPROUT_PASSWORD")
            .map_err(|_| EngageError::Config("SPROUT_PASSWORD is not set".to_string()))?;
        Ok(Self { username, password })
    }
}

/// 设备指纹：跨登录保持一致，避免远端风控将重登视为新设备
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub device_id: String,
    pub phone_id: String,
    pub advertising_id: String,
}

impl DeviceIdentity {
    /// 首次登录时生成；之后从持久化会话中复用
    pub fn generate() -> Self {
        Self {
            device_id: Uuid::new_v4().to_string(),
            phone_id: Uuid::new_v4().to_string(),
            advertising_id: Uuid::new_v4().to_string(),
        }
    }
}

/// 会话状态：仅 SessionManager 读写，整体序列化到 session.json
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionState {
    pub token: String,
    pub user_id: String,
    pub device: DeviceIdentity,
}

/// 标签分类：专业 / 泛化，决定评论生成时的人设
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagClass {
    Expert,
    General,
}

/// 动作类型：轻量点赞（endorse）或文字评论（annotate）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Endorse,
    Annotate,
}

impl ActionKind {
    /// 台账中的存储名
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Endorse => "endorse",
            ActionKind::Annotate => "annotate",
        }
    }
}

/// 单条帖子的只读快照（分页接口返回）
#[derive(Clone, Debug)]
pub struct MediaItem {
    /// 公开 id，动作下发用
    pub id: String,
    /// 内部主键，详情拉取用
    pub pk: String,
    pub like_count: u64,
    pub comment_count: u64,
    pub caption: Option<String>,
}

/// 帖子详情（完整 caption 来源）
#[derive(Clone, Debug, Default)]
pub struct MediaDetail {
    pub caption_text: Option<String>,
}

/// 一页标签帖子与下一页游标
#[derive(Clone, Debug)]
pub struct TagPage {
    pub items: Vec<MediaItem>,
    pub next_cursor: Option<String>,
}
