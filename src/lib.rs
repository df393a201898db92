//! Sprout - 社媒标签互动智能体
//!
//! 模块划分：
//! - **compose**: 评论合成（LLM 生成 + 静态池回落 + 表情剥离）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误分类、动作预算、限速、候选筛选、主控循环
//! - **corpus**: 行式语料加载（回落评论、两类标签）
//! - **llm**: 文本生成抽象与实现（OpenAI 兼容 / Mock）
//! - **observability**: tracing 初始化
//! - **social**: 领域类型、社媒客户端抽象与实现、会话管理
//! - **store**: 标签游标与动作台账持久化

pub mod compose;
pub mod config;
pub mod core;
pub mod corpus;
pub mod llm;
pub mod observability;
pub mod social;
pub mod store;
