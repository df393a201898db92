//! 社媒客户端抽象
//!
//! 每个调用返回带标记的结果：会话失效（SessionInvalid）与一般瞬时失败
//! （Transient）严格区分，由编排器的状态机显式检查，不使用环境异常式控制流。

use async_trait::async_trait;

use crate::social::{
    Credentials, DeviceIdentity, MediaDetail, SessionState, TagPage,
};

/// 社媒调用的失败标记
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SocialError {
    /// 远端判定会话已失效，需要重新认证后继续
    SessionInvalid,
    /// 其他瞬时失败：记录日志、放弃本轮、循环继续
    Transient(String),
}

impl std::fmt::Display for SocialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SocialError::SessionInvalid => write!(f, "session invalidated"),
            SocialError::Transient(msg) => write!(f, "{msg}"),
        }
    }
}

/// 社媒客户端 trait：认证、分页、详情与动作下发
///
/// 会话状态由 SessionManager 独占持有，按调用传入；客户端自身无状态。
#[async_trait]
pub trait SocialClient: Send + Sync {
    /// 凭证 + 设备指纹登录，成功返回新的会话状态
    async fn login(
        &self,
        credentials: &Credentials,
        device: &DeviceIdentity,
    ) -> Result<SessionState, SocialError>;

    /// 廉价的带认证探测调用，验证持久化会话是否仍然有效
    async fn resume(&self, session: &SessionState) -> Result<(), SocialError>;

    /// 拉取一页标签帖子；cursor 为 None 时从头开始
    async fn tag_page(
        &self,
        session: &SessionState,
        tag: &str,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<TagPage, SocialError>;

    /// 按内部主键拉取帖子详情（完整 caption）
    async fn media_detail(
        &self,
        session: &SessionState,
        pk: &str,
    ) -> Result<MediaDetail, SocialError>;

    /// 点赞
    async fn endorse(&self, session: &SessionState, media_id: &str) -> Result<(), SocialError>;

    /// 发表评论
    async fn annotate(
        &self,
        session: &SessionState,
        media_id: &str,
        text: &str,
    ) -> Result<(), SocialError>;
}
