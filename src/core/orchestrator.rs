//! 互动编排器：主控循环
//!
//! 驱动标签分页、候选筛选、动作下发、台账落盘与限速调整；
//! 任何远端调用报会话失效时重新认证后从下一个标签继续，
//! 仅重新认证失败（Auth）终止运行。严格单线程顺序执行，
//! 睡眠只发生在编排步骤之间。

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::compose::Composer;
use crate::config::AppConfig;
use crate::core::{
    select_candidate, ActionBudget, EngageError, RateController, SelectionCriteria,
};
use crate::corpus::TagBook;
use crate::llm::TextGenerator;
use crate::social::{ActionKind, SessionManager, SocialClient, SocialError, TagClass};
use crate::store::{ActionLedger, CursorStore};

/// 一次运行的汇总
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub actions: u32,
    pub ceiling: u32,
    pub tags_visited: usize,
}

/// 单个标签轮次的结果
enum CycleOutcome {
    Acted(ActionKind),
    Skipped,
}

/// 单个标签轮次的失败：失效会话走重新认证流转，其余放弃本轮
enum CycleFault {
    SessionInvalid,
    Abandon(EngageError),
}

impl From<SocialError> for CycleFault {
    fn from(e: SocialError) -> Self {
        match e {
            SocialError::SessionInvalid => CycleFault::SessionInvalid,
            SocialError::Transient(msg) => CycleFault::Abandon(EngageError::Remote(msg)),
        }
    }
}

/// 编排器：启动时装配一次的显式上下文对象，运行期唯一的状态写入方
pub struct Engagement {
    client: Arc<dyn SocialClient>,
    generator: Arc<dyn TextGenerator>,
    ledger: Arc<dyn ActionLedger>,
    session: SessionManager,
    cursors: CursorStore,
    composer: Composer,
    tags: TagBook,
    rate: RateController,
    budget: ActionBudget,
    criteria: SelectionCriteria,
    page_size: usize,
    rng: StdRng,
}

impl Engagement {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cfg: &AppConfig,
        client: Arc<dyn SocialClient>,
        generator: Arc<dyn TextGenerator>,
        ledger: Arc<dyn ActionLedger>,
        session: SessionManager,
        cursors: CursorStore,
        composer: Composer,
        tags: TagBook,
        mut rng: StdRng,
    ) -> Self {
        // 上限每次运行抽取一次
        let budget = ActionBudget::draw(
            cfg.engage.max_actions_min,
            cfg.engage.max_actions_max,
            &mut rng,
        );
        Self {
            client,
            generator,
            ledger,
            session,
            cursors,
            composer,
            tags,
            rate: RateController::new(&cfg.rate),
            budget,
            criteria: SelectionCriteria {
                like_threshold: cfg.engage.like_threshold,
                comment_threshold: cfg.engage.comment_threshold,
                sample_size: cfg.engage.sample_size,
            },
            page_size: cfg.engage.page_size,
            rng,
        }
    }

    /// 主控循环：预算耗尽或标签用尽时结束
    pub async fn run(&mut self) -> Result<RunSummary, EngageError> {
        self.session.ensure_session(self.client.as_ref()).await?;
        self.rate.set_baseline();

        let mut order = self.tags.combined();
        order.shuffle(&mut self.rng);
        tracing::info!(
            "Engaging {} tags, action ceiling {}",
            order.len(),
            self.budget.ceiling()
        );

        let mut visited = 0usize;
        for (tag, class) in order {
            if self.budget.exhausted() {
                tracing::info!("Reached {} actions. Let's call it a day", self.budget.ceiling());
                break;
            }
            visited += 1;
            tracing::info!("Processing tag #{tag}");

            match self.engage_tag(&tag, class).await {
                Ok(CycleOutcome::Acted(kind)) => {
                    tracing::info!(
                        "Took {} on #{tag} ({}/{} actions)",
                        kind.as_str(),
                        self.budget.taken(),
                        self.budget.ceiling()
                    );
                }
                Ok(CycleOutcome::Skipped) => {}
                Err(CycleFault::SessionInvalid) => {
                    tracing::warn!("Session invalidated while processing #{tag}, re-authenticating");
                    // Auth 失败由 ? 向上传播并终止运行
                    self.session.reauthenticate(self.client.as_ref()).await?;
                    self.rate.set_baseline();
                }
                Err(CycleFault::Abandon(e)) => {
                    tracing::warn!("Abandoning #{tag}: {e}");
                }
            }
        }

        Ok(RunSummary {
            actions: self.budget.taken(),
            ceiling: self.budget.ceiling(),
            tags_visited: visited,
        })
    }

    /// 单个标签的完整轮次：拉页 → 推进游标 → 筛选 → 下发 → 落账
    async fn engage_tag(&mut self, tag: &str, class: TagClass) -> Result<CycleOutcome, CycleFault> {
        self.pause().await;

        let session = self.session.state().cloned().ok_or_else(|| {
            CycleFault::Abandon(EngageError::Remote("no active session".to_string()))
        })?;

        let cursor = self.cursors.get(tag).map(String::from);
        let page = self
            .client
            .tag_page(&session, tag, cursor.as_deref(), self.page_size)
            .await?;
        tracing::info!("Retrieved {} posts for #{tag}", page.items.len());

        // 动作之前先推进并落盘游标：中途崩溃不会重拉同一页
        if let Some(next) = page.next_cursor.as_deref() {
            self.cursors.advance(tag, next);
            if let Err(e) = self.cursors.save() {
                tracing::warn!("Failed to persist cursors: {e}");
            }
        }
        self.rate.set_follow_up();

        let Some(candidate) =
            select_candidate(&page.items, &self.criteria, self.ledger.as_ref(), &mut self.rng)
        else {
            tracing::info!("No suitable post found for #{tag}");
            return Ok(CycleOutcome::Skipped);
        };

        let kind = if self.rng.random_bool(0.5) {
            ActionKind::Endorse
        } else {
            ActionKind::Annotate
        };

        match kind {
            ActionKind::Endorse => {
                self.client.endorse(&session, &candidate.id).await?;
                tracing::info!("Endorsed post {}", candidate.id);
                self.settle(&candidate.id, kind, None);
            }
            ActionKind::Annotate => {
                self.pause().await;
                let detail = self.client.media_detail(&session, &candidate.pk).await?;
                self.rate.set_follow_up();

                let caption = detail.caption_text.or_else(|| candidate.caption.clone());
                let composed = self
                    .composer
                    .compose(caption.as_deref(), class, self.generator.as_ref(), &mut self.rng)
                    .await
                    .map_err(|e| {
                        CycleFault::Abandon(EngageError::Remote(format!(
                            "comment generation failed: {e}"
                        )))
                    })?;

                self.pause().await;
                self.client
                    .annotate(&session, &candidate.id, &composed.text)
                    .await?;
                tracing::info!("Annotated post {}: {}", candidate.id, composed.text);
                self.settle(&candidate.id, kind, Some(&composed.text));
            }
        }
        Ok(CycleOutcome::Acted(kind))
    }

    /// 成功下发后的收尾：落账（重试一次，失败高声记录）、消耗预算、切换冷却
    fn settle(&mut self, media_id: &str, kind: ActionKind, detail: Option<&str>) {
        let mut result = self.ledger.record_action(media_id, kind, detail);
        if result.is_err() {
            result = self.ledger.record_action(media_id, kind, detail);
        }
        if let Err(e) = result {
            let err = EngageError::LedgerWrite(e);
            tracing::error!(
                "{err}; post {media_id} may receive a duplicate {} in a future run",
                kind.as_str()
            );
        }
        self.budget.consume();
        self.rate.set_cooldown(kind);
    }

    /// 在当前限速区间内抽样并睡眠
    async fn pause(&mut self) {
        let delay = self.rate.current_window().sample(&mut self.rng);
        if !delay.is_zero() {
            tracing::debug!("Sleeping {delay:?} before next remote call");
            tokio::time::sleep(delay).await;
        }
    }
}
