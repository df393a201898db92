//! 文本生成器抽象
//!
//! 所有后端（OpenAI 兼容 / Mock）实现 TextGenerator：按 system/user
//! 两段 Prompt 生成一段文本。生成失败由调用方（编排器）决定如何处置。

use async_trait::async_trait;

/// 文本生成器 trait：单轮 system + user 补全
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// 非流式补全，返回生成文本
    async fn complete(&self, system: &str, user: &str) -> Result<String, String>;

    /// 获取累计 token 使用统计：(prompt_tokens, completion_tokens, total_tokens)
    /// 默认返回 (0, 0, 0)，具体实现可覆盖
    fn token_usage(&self) -> (u64, u64, u64) {
        (0, 0, 0)
    }
}
