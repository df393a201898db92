//! 互动主循环集成测试
//!
//! 用脚本化 Mock 客户端驱动完整编排循环，覆盖：无合格帖子、成功动作、
//! 预算上限、会话失效恢复、生成器失败与台账写入失败。

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use sprout::compose::{Composer, PersonaPrompt, PromptBook};
    use sprout::config::AppConfig;
    use sprout::core::Engagement;
    use sprout::corpus::TagBook;
    use sprout::llm::{FailingTextGenerator, MockTextGenerator, TextGenerator};
    use sprout::social::{
        ActionKind, Credentials, MediaItem, MockSocialClient, SessionManager, SocialClient,
        TagPage,
    };
    use sprout::store::{ActionLedger, CursorStore, MemoryLedger};

    /// 测试配置：固定预算上限、全部限速区间清零（不真实睡眠）
    fn fast_config(ceiling: u32) -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.engage.max_actions_min = ceiling;
        cfg.engage.max_actions_max = ceiling;
        cfg.rate.baseline = [0, 0];
        cfg.rate.follow_up = [0, 0];
        cfg.rate.endorse_cooldown = [0, 0];
        cfg.rate.annotate_cooldown = [0, 0];
        cfg
    }

    fn composer() -> Composer {
        Composer::new(
            PromptBook::from_parts(
                PersonaPrompt {
                    system: "expert persona".to_string(),
                    user_template: "Comment on: ".to_string(),
                },
                PersonaPrompt {
                    system: "general persona".to_string(),
                    user_template: "React to: ".to_string(),
                },
            ),
            vec!["solid point".to_string()],
            200,
        )
    }

    fn credentials() -> Credentials {
        Credentials {
            username: "grower".to_string(),
            password: "hunter2".to_string(),
        }
    }

    fn item(id: &str, likes: u64, comments: u64) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            pk: format!("pk-{id}"),
            like_count: likes,
            comment_count: comments,
            caption: None,
        }
    }

    fn page(items: Vec<MediaItem>, next_cursor: Option<&str>) -> TagPage {
        TagPage {
            items,
            next_cursor: next_cursor.map(String::from),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn engagement(
        cfg: &AppConfig,
        client: &Arc<MockSocialClient>,
        generator: Arc<dyn TextGenerator>,
        ledger: &Arc<MemoryLedger>,
        dir: &tempfile::TempDir,
        tags: TagBook,
        seed: u64,
    ) -> Engagement {
        Engagement::new(
            cfg,
            client.clone() as Arc<dyn SocialClient>,
            generator,
            ledger.clone() as Arc<dyn ActionLedger>,
            SessionManager::new(dir.path().join("session.json"), credentials()),
            CursorStore::load(dir.path().join("cursors.json")),
            composer(),
            tags,
            StdRng::seed_from_u64(seed),
        )
    }

    #[tokio::test]
    async fn test_no_qualifier_takes_no_action() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockSocialClient::new());
        let ledger = Arc::new(MemoryLedger::new());

        // 10 条帖子：1 条已有历史动作，其余 9 条低于阈值
        let mut items: Vec<MediaItem> = (0..9).map(|i| item(&format!("m-{i}"), 10, 1)).collect();
        items.push(item("m-acted", 500, 50));
        ledger.seed("m-acted", ActionKind::Endorse);
        client.push_page("mindfulness", page(items, None));

        let tags = TagBook::from_lists(vec![], vec!["mindfulness".to_string()]);
        let mut run = engagement(
            &fast_config(10),
            &client,
            Arc::new(MockTextGenerator::new("generated remark")),
            &ledger,
            &dir,
            tags,
            3,
        );
        let summary = run.run().await.unwrap();

        assert_eq!(summary.actions, 0);
        assert_eq!(summary.tags_visited, 1);
        assert!(client.endorsed().is_empty());
        assert!(client.annotated().is_empty());
        // 台账仅剩预置记录
        assert_eq!(ledger.count(), 1);
    }

    #[tokio::test]
    async fn test_qualifying_item_records_action_and_advances_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockSocialClient::new());
        let ledger = Arc::new(MemoryLedger::new());

        client.push_page(
            "mindfulness",
            page(vec![item("m-hot", 150, 10)], Some("cursor-2")),
        );

        let tags = TagBook::from_lists(vec![], vec!["mindfulness".to_string()]);
        let mut run = engagement(
            &fast_config(5),
            &client,
            Arc::new(MockTextGenerator::new("generated remark")),
            &ledger,
            &dir,
            tags,
            9,
        );
        let summary = run.run().await.unwrap();

        assert_eq!(summary.actions, 1);
        assert_eq!(client.endorsed().len() + client.annotated().len(), 1);
        assert_eq!(ledger.count(), 1);
        assert!(ledger.has_action("m-hot").unwrap());

        // 首次拉页不带游标，游标在动作之前已落盘
        assert_eq!(client.seen_cursors(), vec![("mindfulness".to_string(), None)]);
        let reloaded = CursorStore::load(dir.path().join("cursors.json"));
        assert_eq!(reloaded.get("mindfulness"), Some("cursor-2"));
    }

    #[tokio::test]
    async fn test_budget_ceiling_stops_run() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockSocialClient::new());
        let ledger = Arc::new(MemoryLedger::new());

        let tag_names: Vec<String> = (0..30).map(|i| format!("tag-{i}")).collect();
        for (i, tag) in tag_names.iter().enumerate() {
            client.push_page(tag, page(vec![item(&format!("m-{i}"), 200, 20)], None));
        }

        let tags = TagBook::from_lists(vec![], tag_names);
        let mut run = engagement(
            &fast_config(5),
            &client,
            Arc::new(MockTextGenerator::new("generated remark")),
            &ledger,
            &dir,
            tags,
            21,
        );
        let summary = run.run().await.unwrap();

        assert_eq!(summary.actions, 5);
        assert_eq!(summary.ceiling, 5);
        assert_eq!(summary.tags_visited, 5);
        assert_eq!(client.endorsed().len() + client.annotated().len(), 5);
        assert_eq!(ledger.count(), 5);
    }

    #[tokio::test]
    async fn test_session_invalidation_reauths_and_resumes_at_next_tag() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockSocialClient::new());
        let ledger = Arc::new(MemoryLedger::new());

        // 第一次数据调用（首个标签的拉页）即报会话失效
        client.invalidate_at_data_call(1);

        let tags = TagBook::from_lists(
            vec![],
            vec!["tag-a".to_string(), "tag-b".to_string()],
        );
        let mut run = engagement(
            &fast_config(5),
            &client,
            Arc::new(MockTextGenerator::new("generated remark")),
            &ledger,
            &dir,
            tags,
            13,
        );
        let summary = run.run().await.unwrap();

        // 初次登录 + 失效后重登，设备指纹保持一致
        let devices = client.login_devices();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0], devices[1]);

        // 触发故障的标签不被重拉：重登后只处理了下一个标签
        assert_eq!(client.seen_cursors().len(), 1);
        assert_eq!(summary.tags_visited, 2);
        assert_eq!(summary.actions, 0);
    }

    #[tokio::test]
    async fn test_generator_failure_skips_cycle_without_record() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockSocialClient::new());
        let ledger = Arc::new(MemoryLedger::new());
        let generator = Arc::new(FailingTextGenerator::default());

        // 每个标签一条合格帖子，详情携带足以触发生成器的长 caption
        let long_caption = "c".repeat(400);
        let tag_names: Vec<String> = (0..16).map(|i| format!("tag-{i}")).collect();
        for (i, tag) in tag_names.iter().enumerate() {
            let id = format!("m-{i}");
            client.push_page(tag, page(vec![item(&id, 200, 20)], None));
            client.set_detail(&format!("pk-{id}"), Some(&long_caption));
        }

        let tags = TagBook::from_lists(vec![], tag_names);
        let mut run = engagement(
            &fast_config(16),
            &client,
            generator.clone(),
            &ledger,
            &dir,
            tags,
            5,
        );
        let summary = run.run().await.unwrap();

        // 评论轮次全部因生成器失败而放弃：无评论、无台账记录、不消耗预算
        assert!(client.annotated().is_empty());
        assert_eq!(summary.actions as usize, client.endorsed().len());
        assert_eq!(ledger.count(), client.endorsed().len());
        // 生成器确实被触发过，且至少一个轮次因此未产生动作
        assert!(generator.calls() >= 1);
        assert!(client.endorsed().len() < 16);
    }

    #[tokio::test]
    async fn test_dispatch_failure_consumes_no_budget() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockSocialClient::new());
        let ledger = Arc::new(MemoryLedger::new());

        client.push_page("tag-a", page(vec![item("m-1", 200, 20)], None));
        client.fail_dispatch_on("m-1");

        let tags = TagBook::from_lists(vec![], vec!["tag-a".to_string()]);
        let mut run = engagement(
            &fast_config(5),
            &client,
            Arc::new(MockTextGenerator::new("generated remark")),
            &ledger,
            &dir,
            tags,
            7,
        );
        let summary = run.run().await.unwrap();

        assert_eq!(summary.actions, 0);
        assert_eq!(ledger.count(), 0);
        assert!(client.endorsed().is_empty());
        assert!(client.annotated().is_empty());
    }

    #[tokio::test]
    async fn test_persisted_cursor_used_on_next_run() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockSocialClient::new());
        let ledger = Arc::new(MemoryLedger::new());
        let tags = TagBook::from_lists(vec![], vec!["tag-a".to_string()]);

        client.push_page("tag-a", page(vec![], Some("page-2")));
        let mut first = engagement(
            &fast_config(5),
            &client,
            Arc::new(MockTextGenerator::new("generated remark")),
            &ledger,
            &dir,
            tags.clone(),
            1,
        );
        first.run().await.unwrap();

        client.push_page("tag-a", page(vec![], None));
        let mut second = engagement(
            &fast_config(5),
            &client,
            Arc::new(MockTextGenerator::new("generated remark")),
            &ledger,
            &dir,
            tags,
            2,
        );
        second.run().await.unwrap();

        let cursors = client.seen_cursors();
        assert_eq!(cursors.len(), 2);
        assert_eq!(cursors[0], ("tag-a".to_string(), None));
        assert_eq!(cursors[1], ("tag-a".to_string(), Some("page-2".to_string())));
    }

    #[tokio::test]
    async fn test_ledger_write_failure_is_loud_but_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockSocialClient::new());
        let ledger = Arc::new(MemoryLedger::new());
        ledger.poison();

        client.push_page("tag-a", page(vec![item("m-1", 200, 20)], None));

        let tags = TagBook::from_lists(vec![], vec!["tag-a".to_string()]);
        let mut run = engagement(
            &fast_config(5),
            &client,
            Arc::new(MockTextGenerator::new("generated remark")),
            &ledger,
            &dir,
            tags,
            17,
        );
        let summary = run.run().await.unwrap();

        // 远端动作已发生：预算照常消耗，台账为空但运行不中止
        assert_eq!(client.endorsed().len() + client.annotated().len(), 1);
        assert_eq!(summary.actions, 1);
        assert_eq!(ledger.count(), 0);
    }
}
