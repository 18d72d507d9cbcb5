//! 目錄清理器
//!
//! 對已解壓的目錄：同名檔案依優先級只保留一個，其餘與非保留檔案移到 `.remove/`，
//! 最後刪除空資料夾

use super::file_grouper::{FileGroup, FileGrouper};
use crate::config::Config;
use crate::tools::{
    ExtensionClassifier, relocate_to_remove, scan_all_files, scan_sub_directories_deepest_first,
};
use anyhow::Result;
use log::{info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// 單一檔案搬移失敗的紀錄
#[derive(Debug, Clone)]
pub struct RelocationFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// 清理統計
#[derive(Debug, Clone, Default)]
pub struct CleanStats {
    /// 掃描到的檔案總數（可保留 + 非保留）
    pub total_files: usize,
    /// 保留的檔案數（每個群組一個）
    pub kept_files: usize,
    /// 已移到 `.remove/` 的檔案數
    pub removed_files: usize,
    /// 刪除的空資料夾數
    pub removed_dirs: usize,
    /// 搬移失敗的檔案
    pub failures: Vec<RelocationFailure>,
    pub success: bool,
    pub error_message: Option<String>,
}

/// 目錄清理器
pub struct DirectoryCleaner {
    classifier: ExtensionClassifier,
}

impl DirectoryCleaner {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            classifier: ExtensionClassifier::new(config),
        }
    }

    /// 清理目錄
    ///
    /// 不會回傳錯誤：個別檔案的失敗記錄在統計中，批次處理不中斷
    #[must_use]
    pub fn clean(&self, root: &Path) -> CleanStats {
        info!("開始清理目錄: {}", root.display());

        let mut stats = CleanStats::default();

        if !root.is_dir() {
            warn!("清理目標不是資料夾: {}", root.display());
            stats.error_message = Some(format!("路徑不是資料夾: {}", root.display()));
            return stats;
        }

        let grouped = FileGrouper::new(&self.classifier).group(scan_all_files(root));
        stats.total_files = grouped.total_files();

        let mut handled: HashSet<PathBuf> = HashSet::new();

        for group in &grouped.groups {
            self.resolve_group(group, &mut handled, &mut stats);
        }

        let mut non_keep_count = 0;
        for file in &grouped.non_keep_files {
            if !handled.insert(file.clone()) {
                continue;
            }
            non_keep_count += 1;
            info!("移動非保留檔案: {}", file.display());
            Self::record_relocation(file, relocate_to_remove(file), &mut stats);
        }
        info!("共處理 {non_keep_count} 個非保留檔案");

        stats.removed_dirs = Self::remove_empty_directories(root);

        stats.success = stats.failures.is_empty();
        if !stats.success {
            stats.error_message = Some(format!("{} 個檔案移動失敗", stats.failures.len()));
        }

        info!(
            "清理完成: {} (總計: {}, 保留: {}, 移除: {}, 失敗: {}, 刪除空資料夾: {})",
            root.display(),
            stats.total_files,
            stats.kept_files,
            stats.removed_files,
            stats.failures.len(),
            stats.removed_dirs
        );

        stats
    }

    /// 處理單一群組：保留優先級最高者，其餘搬到 `.remove/`
    fn resolve_group(
        &self,
        group: &FileGroup,
        handled: &mut HashSet<PathBuf>,
        stats: &mut CleanStats,
    ) {
        let label = group.key.directory.join(&group.key.stem);

        if group.files.is_empty() {
            return;
        }

        if group.is_single() {
            let file = &group.files[0];
            handled.insert(file.clone());
            stats.kept_files += 1;
            info!(
                "檔案組 {} 只有一個檔案，保留: {}",
                label.display(),
                file.display()
            );
            return;
        }

        // sort_by_key 為穩定排序，同優先級維持掃描順序
        let mut ordered = group.files.clone();
        ordered.sort_by_key(|file| self.classifier.priority_of_file(file));

        info!("檔案組 {} 優先級排序結果:", label.display());
        for (i, file) in ordered.iter().enumerate() {
            info!(
                "  {}. {} (優先級: {})",
                i + 1,
                file.display(),
                self.classifier.priority_of_file(file)
            );
        }

        let (keep, rest) = ordered.split_at(1);
        handled.insert(keep[0].clone());
        stats.kept_files += 1;
        info!("檔案組 {} 保留檔案: {}", label.display(), keep[0].display());

        for file in rest {
            handled.insert(file.clone());
            info!("檔案組 {} 移動檔案: {}", label.display(), file.display());
            Self::record_relocation(file, relocate_to_remove(file), stats);
        }
    }

    fn record_relocation(file: &Path, result: Result<PathBuf>, stats: &mut CleanStats) {
        match result {
            Ok(_) => stats.removed_files += 1,
            Err(e) => {
                warn!("移動檔案失敗 {}: {e:#}", file.display());
                stats.failures.push(RelocationFailure {
                    path: file.to_path_buf(),
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    /// 刪除根目錄以下所有空資料夾（根目錄本身保留），回傳刪除數量
    fn remove_empty_directories(root: &Path) -> usize {
        let mut removed = 0;

        for dir in scan_sub_directories_deepest_first(root) {
            let is_empty = fs::read_dir(&dir).is_ok_and(|mut entries| entries.next().is_none());
            if !is_empty {
                continue;
            }

            match fs::remove_dir(&dir) {
                Ok(()) => {
                    info!("刪除空目錄: {}", dir.display());
                    removed += 1;
                }
                Err(e) => warn!("無法刪除空目錄 {}: {e}", dir.display()),
            }
        }

        removed
    }
}
