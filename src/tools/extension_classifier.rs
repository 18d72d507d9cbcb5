//! 副檔名分類器
//!
//! 判斷副檔名是否需要保留，並依設定回傳優先級

use crate::config::{Config, normalize_extension};
use std::path::Path;

/// 副檔名分類器
#[derive(Debug, Clone)]
pub struct ExtensionClassifier {
    keep_extensions: Vec<String>,
    priority: Vec<String>,
}

impl ExtensionClassifier {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            keep_extensions: config.keep_extensions.clone(),
            priority: config.priority.clone(),
        }
    }

    /// 副檔名是否在保留清單中（不分大小寫，可帶或不帶前導點）
    #[must_use]
    pub fn is_keep_extension(&self, ext: &str) -> bool {
        let ext = normalize_extension(ext);
        self.keep_extensions.contains(&ext)
    }

    /// 取得副檔名的優先級，數字越小越優先
    ///
    /// 未設定的副檔名回傳 `priority.len()`，排在所有已設定項目之後
    #[must_use]
    pub fn priority_of(&self, ext: &str) -> usize {
        let ext = normalize_extension(ext);
        self.priority
            .iter()
            .position(|p| *p == ext)
            .unwrap_or(self.priority.len())
    }

    /// 檔案路徑是否可保留
    #[must_use]
    pub fn is_keep_file(&self, path: &Path) -> bool {
        self.is_keep_extension(&extension_of(path))
    }

    /// 檔案路徑的優先級
    #[must_use]
    pub fn priority_of_file(&self, path: &Path) -> usize {
        self.priority_of(&extension_of(path))
    }

    /// 最低優先級（等於優先順序清單長度）
    #[must_use]
    pub fn lowest_rank(&self) -> usize {
        self.priority.len()
    }
}

/// 取得路徑的副檔名（小寫，不含點）；沒有副檔名時回傳空字串
///
/// 以檔名最後一個點切分，`.pdf` 這類點開頭的檔名副檔名為 `pdf`
#[must_use]
pub fn extension_of(path: &Path) -> String {
    let name = file_name_of(path);
    name.rfind('.')
        .map(|i| name[i + 1..].to_lowercase())
        .unwrap_or_default()
}

/// 取得去掉副檔名的檔名，與 [`extension_of`] 使用相同的切分方式
#[must_use]
pub fn stem_of(path: &Path) -> String {
    let name = file_name_of(path);
    match name.rfind('.') {
        Some(i) => name[..i].to_string(),
        None => name,
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
