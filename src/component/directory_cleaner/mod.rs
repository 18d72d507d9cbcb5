//! 目錄清理元件
//!
//! 依設定的保留副檔名與優先順序整理已解壓的目錄

mod file_grouper;
mod main;

pub use file_grouper::{FileGroup, FileGrouper, GroupKey, GroupedFiles};
pub use main::{CleanStats, DirectoryCleaner, RelocationFailure};
