//! 标签游标持久化
//!
//! tag → 分页令牌的扁平映射，写入/从 JSON 文件加载，使断点续跑不重拉已见页。
//! 每次成功拉页后立即落盘；运行内游标只前进不回退（由编排器保证）。

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 单文件 JSON 游标存储
#[derive(Debug)]
pub struct CursorStore {
    path: PathBuf,
    cursors: HashMap<String, String>,
}

impl CursorStore {
    /// 从 JSON 文件加载；文件不存在或无法解析时从空映射开始
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let cursors = match std::fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!("Cursor file {} unreadable ({e}), starting fresh", path.display());
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, cursors }
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.cursors.get(tag).map(String::as_str)
    }

    /// 前进某标签的游标（仅在成功拉页后调用）
    pub fn advance(&mut self, tag: &str, cursor: &str) {
        self.cursors.insert(tag.to_string(), cursor.to_string());
    }

    /// 将全部游标写入 JSON 文件；父目录不存在时自动创建
    pub fn save(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
            }
        }
        let data = serde_json::to_string_pretty(&self.cursors).map_err(|e| e.to_string())?;
        std::fs::write(&self.path, data).map_err(|e| e.to_string())
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }
}
