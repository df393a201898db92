//! LLM 层：文本生成抽象与实现（OpenAI 兼容 / Mock）

pub mod mock;
pub mod openai;
pub mod traits;

pub use mock::{FailingTextGenerator, MockTextGenerator};
pub use openai::{OpenAiGenerator, TokenUsage};
pub use traits::TextGenerator;
