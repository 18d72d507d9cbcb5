use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// 被移除檔案的存放資料夾名稱
pub const REMOVE_DIR_NAME: &str = ".remove";

fn is_remove_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == REMOVE_DIR_NAME
}

/// 遞迴掃描目錄下所有一般檔案（依檔名排序，略過 `.remove` 資料夾）
#[must_use]
pub fn scan_all_files(directory: &Path) -> Vec<PathBuf> {
    WalkDir::new(directory)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_remove_dir(entry))
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(DirEntry::into_path)
        .collect()
}

/// 列出目錄下所有子資料夾（不含根目錄本身），子資料夾排在父資料夾之前
#[must_use]
pub fn scan_sub_directories_deepest_first(directory: &Path) -> Vec<PathBuf> {
    WalkDir::new(directory)
        .follow_links(false)
        .min_depth(1)
        .contents_first(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .map(DirEntry::into_path)
        .collect()
}
