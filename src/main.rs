//! Sprout - 社媒标签互动智能体
//!
//! 入口：初始化日志、加载配置与语料、装配上下文并运行互动主循环。

use std::sync::Arc;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;

use sprout::compose::{Composer, PromptBook};
use sprout::config::load_config;
use sprout::core::Engagement;
use sprout::corpus::{read_lines, TagBook};
use sprout::llm::{OpenAiGenerator, TextGenerator};
use sprout::social::{Credentials, HttpSocialClient, SessionManager, SocialClient};
use sprout::store::{ActionLedger, CursorStore, SqliteLedger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 日志：默认 info，可通过 RUST_LOG 覆盖
    sprout::observability::init();

    let cfg = load_config(None).context("Failed to load configuration")?;

    // 凭证缺失是配置错误，在任何远端调用之前报出
    let credentials = Credentials::from_env()?;

    let prompts = PromptBook::from_config(&cfg)?;
    let fallback = read_lines(&cfg.corpus.comments_path)?;
    let tags = TagBook::load(&cfg.corpus.expert_tags_path, &cfg.corpus.general_tags_path)?;
    let composer = Composer::new(prompts, fallback, cfg.engage.min_caption_length);

    let client: Arc<dyn SocialClient> = Arc::new(HttpSocialClient::new(&cfg.social)?);
    let generator: Arc<dyn TextGenerator> = Arc::new(OpenAiGenerator::new(
        cfg.llm.base_url.as_deref(),
        &cfg.llm.model,
        None,
    ));
    let ledger: Arc<dyn ActionLedger> = Arc::new(SqliteLedger::open(&cfg.social.ledger_path)?);
    let cursors = CursorStore::load(&cfg.social.cursors_path);
    let session = SessionManager::new(&cfg.social.session_path, credentials);

    let mut engagement = Engagement::new(
        &cfg,
        client,
        generator.clone(),
        ledger,
        session,
        cursors,
        composer,
        tags,
        StdRng::from_os_rng(),
    );

    let summary = engagement.run().await.context("Engagement run failed")?;

    let (prompt_tokens, completion_tokens, total_tokens) = generator.token_usage();
    tracing::info!(
        "Run complete: {}/{} actions across {} tags (LLM tokens: {prompt_tokens} prompt / {completion_tokens} completion / {total_tokens} total)",
        summary.actions,
        summary.ceiling,
        summary.tags_visited
    );

    Ok(())
}
