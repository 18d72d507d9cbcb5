//! 壓縮檔處理元件
//!
//! 串接既有內容檢查、解壓、失敗復原、目錄清理與清單產生

mod main;
mod reporter;

pub use main::{
    ArchiveOrchestrator, ArchiveReport, ArchiveState, ManifestEntry, collect_manifest_entries,
};
pub use reporter::{ArchiveReporter, ConsoleReporter, SilentReporter};
