//! 动作台账：已执行动作的追加式记录，去重的唯一事实来源
//!
//! SQLite 实现用于生产；内存实现用于测试。记录仅在远端动作成功后写入，
//! 写入失败由编排器重试并高声记录（绝不静默丢弃）。

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use crate::core::EngageError;
use crate::social::ActionKind;

/// 台账 trait：按帖子 id 查询与追加
pub trait ActionLedger: Send + Sync {
    /// 该帖子是否已有历史动作
    fn has_action(&self, media_id: &str) -> Result<bool, String>;

    /// 追加一条动作记录（detail 仅评论动作携带文本）
    fn record_action(
        &self,
        media_id: &str,
        kind: ActionKind,
        detail: Option<&str>,
    ) -> Result<(), String>;
}

/// SQLite 台账：单表 media_actions，时间戳为 RFC 3339
pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    /// 打开（或创建）台账数据库；失败视为配置错误
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EngageError> {
        let conn = Connection::open(path.as_ref()).map_err(|e| {
            EngageError::Config(format!(
                "Failed to open ledger {}: {e}",
                path.as_ref().display()
            ))
        })?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS media_actions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                media_id TEXT NOT NULL,
                action_type TEXT NOT NULL,
                action_details TEXT,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| EngageError::Config(format!("Failed to init ledger schema: {e}")))?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_media_actions_media_id
             ON media_actions (media_id)",
            [],
        )
        .map_err(|e| EngageError::Config(format!("Failed to init ledger index: {e}")))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl ActionLedger for SqliteLedger {
    fn has_action(&self, media_id: &str) -> Result<bool, String> {
        let conn = self.conn.lock().map_err(|e| e.to_string())?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM media_actions WHERE media_id = ?1",
                params![media_id],
                |row| row.get(0),
            )
            .map_err(|e| e.to_string())?;
        Ok(count > 0)
    }

    fn record_action(
        &self,
        media_id: &str,
        kind: ActionKind,
        detail: Option<&str>,
    ) -> Result<(), String> {
        let conn = self.conn.lock().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO media_actions (media_id, action_type, action_details, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                media_id,
                kind.as_str(),
                detail,
                chrono::Utc::now().to_rfc3339()
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// 内存台账：测试用；poisoned 开关可模拟写入失败
#[derive(Default)]
pub struct MemoryLedger {
    records: Mutex<HashMap<String, (ActionKind, Option<String>)>>,
    poisoned: Mutex<bool>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置一条历史记录（测试去重路径）
    pub fn seed(&self, media_id: &str, kind: ActionKind) {
        self.records
            .lock()
            .unwrap()
            .insert(media_id.to_string(), (kind, None));
    }

    /// 令后续写入失败
    pub fn poison(&self) {
        *self.poisoned.lock().unwrap() = true;
    }

    pub fn recorded(&self) -> Vec<(String, ActionKind, Option<String>)> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|(id, (kind, detail))| (id.clone(), *kind, detail.clone()))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl ActionLedger for MemoryLedger {
    fn has_action(&self, media_id: &str) -> Result<bool, String> {
        Ok(self.records.lock().unwrap().contains_key(media_id))
    }

    fn record_action(
        &self,
        media_id: &str,
        kind: ActionKind,
        detail: Option<&str>,
    ) -> Result<(), String> {
        if *self.poisoned.lock().unwrap() {
            return Err("ledger write refused (poisoned)".to_string());
        }
        self.records
            .lock()
            .unwrap()
            .insert(media_id.to_string(), (kind, detail.map(String::from)));
        Ok(())
    }
}
