//! 错误分类
//!
//! 仅 Config 与 Auth 允许终止进程；Remote / LedgerWrite 在编排器边界
//! 转换为「跳过本轮」并记录日志。会话失效不属于本分类，
//! 由 SocialError::SessionInvalid 标记并触发重新认证流转。

use thiserror::Error;

/// 运行级错误分类
#[derive(Error, Debug)]
pub enum EngageError {
    /// 启动前配置缺失或损坏（凭证、Prompt 段、语料文件）
    #[error("Config error: {0}")]
    Config(String),

    /// 会话恢复与重新登录均失败，唯一不可恢复的运行期错误
    #[error("Auth error: {0}")]
    Auth(String),

    /// 远端调用（社媒 / 文本生成）失败，可恢复
    #[error("Remote error: {0}")]
    Remote(String),

    /// 远端动作已发生但台账落盘失败，存在未来重复动作的风险
    #[error("Ledger write error: {0}")]
    LedgerWrite(String),
}
