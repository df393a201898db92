//! Mock 文本生成器（用于测试，无需 API）
//!
//! MockTextGenerator 返回固定文本并记录调用次数；
//! FailingTextGenerator 恒定失败，用于验证「生成失败不回落」的语义。

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::llm::TextGenerator;

/// Mock 生成器：返回固定回复
#[derive(Debug, Default)]
pub struct MockTextGenerator {
    reply: String,
    calls: AtomicUsize,
}

impl MockTextGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// 已被调用的次数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// 恒定失败的生成器：模拟端点不可用
#[derive(Debug, Default)]
pub struct FailingTextGenerator {
    calls: AtomicUsize,
}

impl FailingTextGenerator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FailingTextGenerator {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err("text generator unavailable".to_string())
    }
}
