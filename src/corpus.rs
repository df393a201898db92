//! 静态语料：行式文件加载与标签册
//!
//! 三个输入文件（回落评论、专业标签、泛化标签）每行一条，去首尾空白、
//! 跳过空行，保持读入顺序；乱序只发生在每次运行开始时的一次 shuffle。

use std::path::Path;

use crate::core::EngageError;
use crate::social::TagClass;

/// 读取行式语料文件；IO 失败或结果为空均视为配置错误
pub fn read_lines(path: &Path) -> Result<Vec<String>, EngageError> {
    let data = std::fs::read_to_string(path).map_err(|e| {
        EngageError::Config(format!("Failed to read {}: {e}", path.display()))
    })?;
    let lines: Vec<String> = data
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();
    if lines.is_empty() {
        return Err(EngageError::Config(format!(
            "Corpus file {} contains no usable lines",
            path.display()
        )));
    }
    Ok(lines)
}

/// 标签册：专业 / 泛化两个互斥集合，加载后只读
#[derive(Clone, Debug)]
pub struct TagBook {
    expert: Vec<String>,
    general: Vec<String>,
}

impl TagBook {
    pub fn load(expert_path: &Path, general_path: &Path) -> Result<Self, EngageError> {
        Ok(Self {
            expert: read_lines(expert_path)?,
            general: read_lines(general_path)?,
        })
    }

    /// 测试与仿真用：直接从内存列表构建
    pub fn from_lists(expert: Vec<String>, general: Vec<String>) -> Self {
        Self { expert, general }
    }

    /// 合并两个集合并携带各自分类；调用方负责运行级 shuffle
    pub fn combined(&self) -> Vec<(String, TagClass)> {
        let mut tags: Vec<(String, TagClass)> = Vec::with_capacity(self.expert.len() + self.general.len());
        tags.extend(self.expert.iter().cloned().map(|t| (t, TagClass::Expert)));
        tags.extend(self.general.iter().cloned().map(|t| (t, TagClass::General)));
        tags
    }

    pub fn len(&self) -> usize {
        self.expert.len() + self.general.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expert.is_empty() && self.general.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_lines_trims_and_skips_blanks() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "  first  \n\nsecond\n   \nthird").unwrap();
        let lines = read_lines(f.path()).unwrap();
        assert_eq!(lines, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_read_lines_missing_file_is_config_error() {
        let err = read_lines(Path::new("no/such/corpus.txt")).unwrap_err();
        assert!(matches!(err, EngageError::Config(_)));
    }

    #[test]
    fn test_read_lines_empty_file_is_config_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "\n   \n").unwrap();
        let err = read_lines(f.path()).unwrap_err();
        assert!(matches!(err, EngageError::Config(_)));
    }

    #[test]
    fn test_tag_book_combined_keeps_classes_disjoint() {
        let book = TagBook::from_lists(
            vec!["adaptogens".to_string()],
            vec!["mindfulness".to_string(), "selfcare".to_string()],
        );
        let combined = book.combined();
        assert_eq!(combined.len(), 3);
        assert_eq!(
            combined.iter().filter(|(_, c)| *c == TagClass::Expert).count(),
            1
        );
        assert_eq!(
            combined.iter().filter(|(_, c)| *c == TagClass::General).count(),
            2
        );
    }
}
