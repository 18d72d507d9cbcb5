use crate::component::directory_cleaner::CleanStats;
use console::style;
use indicatif::ProgressBar;
use std::fmt::Write;
use std::path::Path;

/// 每個壓縮檔處理過程的主控台回報介面
pub trait ArchiveReporter {
    fn extraction_started(&self, archive: &Path);
    fn found_existing(&self, archive: &Path);
    fn extraction_failed(&self, archive: &Path, reason: &str);
    fn cleaned(&self, archive: &Path, stats: &CleanStats, freshly_extracted: bool);
}

/// 輸出到主控台的回報器（與進度條共用畫面）
pub struct ConsoleReporter {
    progress_bar: ProgressBar,
}

impl ConsoleReporter {
    #[must_use]
    pub const fn new(progress_bar: ProgressBar) -> Self {
        Self { progress_bar }
    }

    fn print(&self, line: String) {
        self.progress_bar.suspend(|| println!("{line}"));
    }
}

fn display_name(archive: &Path) -> String {
    archive
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| archive.display().to_string())
}

impl ArchiveReporter for ConsoleReporter {
    fn extraction_started(&self, archive: &Path) {
        self.print(format!(
            "{} {}",
            style("解壓開始:").cyan(),
            display_name(archive)
        ));
    }

    fn found_existing(&self, archive: &Path) {
        self.print(format!(
            "{} {}",
            style("發現已解壓目錄:").yellow(),
            display_name(archive)
        ));
    }

    fn extraction_failed(&self, archive: &Path, reason: &str) {
        self.print(format!(
            "{} {} ({})",
            style("解壓失敗:").red().bold(),
            display_name(archive),
            reason
        ));
    }

    fn cleaned(&self, archive: &Path, stats: &CleanStats, freshly_extracted: bool) {
        let label = if freshly_extracted {
            "解壓完成:"
        } else {
            "清理完成:"
        };
        let mut line = format!(
            "{} {} (總計: {} 保留: {} 移除: {})",
            style(label).green(),
            display_name(archive),
            stats.total_files,
            style(stats.kept_files).green(),
            style(stats.removed_files).yellow()
        );
        if !stats.failures.is_empty() {
            let _ = write!(line, " {}", style(format!("失敗: {}", stats.failures.len())).red());
        }
        self.print(line);
    }
}

/// 不輸出任何內容的回報器
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ArchiveReporter for SilentReporter {
    fn extraction_started(&self, _archive: &Path) {}
    fn found_existing(&self, _archive: &Path) {}
    fn extraction_failed(&self, _archive: &Path, _reason: &str) {}
    fn cleaned(&self, _archive: &Path, _stats: &CleanStats, _freshly_extracted: bool) {}
}
