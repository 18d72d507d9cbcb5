//! 批次處理
//!
//! 找出根目錄下所有壓縮檔，逐一處理後寫出檔案清單

use super::manifest_writer::{ensure_manifest_writable, write_manifest};
use crate::component::archive_extractor::ArchiveFormat;
use crate::component::archive_orchestrator::{
    ArchiveOrchestrator, ArchiveReporter, ArchiveState, ConsoleReporter, ManifestEntry,
    SilentReporter,
};
use crate::config::Config;
use crate::tools::{scan_all_files, validate_directory_exists};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 批次處理結果
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// 找到的壓縮檔數
    pub archives_found: usize,
    /// 已處理的壓縮檔數
    pub archives_processed: usize,
    /// 完成清理的壓縮檔數
    pub archives_cleaned: usize,
    /// 解壓失敗且無法復原的壓縮檔數
    pub archives_failed: usize,
    /// 清單列數
    pub manifest_rows: usize,
    /// 實際寫出的清單路徑（中斷時為 `None`）
    pub manifest_path: Option<PathBuf>,
    /// 是否因中斷訊號提前結束
    pub interrupted: bool,
}

/// 批次處理器
pub struct BatchDriver {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
    show_progress: bool,
}

impl BatchDriver {
    #[must_use]
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
            show_progress: true,
        }
    }

    /// 設定是否顯示進度條與主控台摘要
    #[must_use]
    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// 找出目錄下所有支援的壓縮檔（依路徑排序）
    #[must_use]
    pub fn discover_archives(root: &Path) -> Vec<PathBuf> {
        scan_all_files(root)
            .into_iter()
            .filter(|path| ArchiveFormat::from_path(path).is_some())
            .collect()
    }

    /// 執行批次處理
    ///
    /// 壓縮檔依序處理，全部完成後才寫出清單；收到中斷訊號時不產生清單
    pub fn run(&self, root: &Path, manifest_path: &Path) -> Result<BatchSummary> {
        validate_directory_exists(root)?;
        ensure_manifest_writable(manifest_path)?;

        info!("================== 開始執行 ==================");
        info!("根目錄: {}", root.display());

        let archives = Self::discover_archives(root);
        if archives.is_empty() {
            info!("在指定目錄中未找到任何壓縮檔");
        } else {
            info!("找到 {} 個壓縮檔", archives.len());
        }

        let progress_bar = self.create_progress_bar(archives.len())?;
        let reporter: Box<dyn ArchiveReporter> = if self.show_progress {
            Box::new(ConsoleReporter::new(progress_bar.clone()))
        } else {
            Box::new(SilentReporter)
        };
        let orchestrator = ArchiveOrchestrator::new(&self.config, reporter);

        self.process_archives(&orchestrator, &archives, &progress_bar, manifest_path)
    }

    fn process_archives(
        &self,
        orchestrator: &ArchiveOrchestrator,
        archives: &[PathBuf],
        progress_bar: &ProgressBar,
        manifest_path: &Path,
    ) -> Result<BatchSummary> {
        let mut summary = BatchSummary {
            archives_found: archives.len(),
            ..BatchSummary::default()
        };

        let mut entries: Vec<ManifestEntry> = Vec::new();
        for archive in archives {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                summary.interrupted = true;
                break;
            }

            let report = orchestrator.process(archive);
            summary.archives_processed += 1;
            match report.final_state() {
                ArchiveState::Cleaned => summary.archives_cleaned += 1,
                _ => summary.archives_failed += 1,
            }
            entries.extend(report.entries);
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        // 最後一個壓縮檔處理期間收到的中斷
        if self.shutdown_signal.load(Ordering::SeqCst) {
            summary.interrupted = true;
        }

        if summary.interrupted {
            warn!(
                "收到中斷訊號，已處理 {}/{} 個壓縮檔，不產生檔案清單",
                summary.archives_processed, summary.archives_found
            );
            return Ok(summary);
        }

        write_manifest(manifest_path, &entries)?;
        summary.manifest_rows = entries.len();
        summary.manifest_path = Some(manifest_path.to_path_buf());

        info!(
            "處理完成 - 壓縮檔: {}, 清理: {}, 失敗: {}, 清單列數: {}",
            summary.archives_found,
            summary.archives_cleaned,
            summary.archives_failed,
            summary.manifest_rows
        );
        info!("================== 執行完畢 ==================");

        Ok(summary)
    }

    fn create_progress_bar(&self, len: usize) -> Result<ProgressBar> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }

        let progress_bar = ProgressBar::new(len as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        progress_bar.set_message("處理壓縮檔中...");
        Ok(progress_bar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::archive_extractor::{ArchiveFormat, Decompressor};
    use std::fs;
    use tempfile::TempDir;

    /// 解壓時寫入一個檔案並觸發中斷訊號
    struct InterruptingExtractor {
        shutdown_signal: Arc<AtomicBool>,
    }

    impl Decompressor for InterruptingExtractor {
        fn extract(&self, _source: &Path, destination: &Path) -> Result<()> {
            fs::write(destination.join("report.pdf"), "pdf")?;
            self.shutdown_signal.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    fn create_driver(shutdown_signal: Arc<AtomicBool>) -> BatchDriver {
        BatchDriver::new(Config::new(["pdf"], Vec::<String>::new()), shutdown_signal)
            .with_progress(false)
    }

    #[test]
    fn test_discover_archives() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        fs::create_dir_all(base.join("nested/.remove")).unwrap();
        fs::write(base.join("a.zip"), "").unwrap();
        fs::write(base.join("B.RAR"), "").unwrap();
        fs::write(base.join("nested/disc.iso"), "").unwrap();
        fs::write(base.join("nested/.remove/old.zip"), "").unwrap();
        fs::write(base.join("notes.txt"), "").unwrap();
        fs::write(base.join("bundle.7z"), "").unwrap();

        let archives = BatchDriver::discover_archives(base);

        assert_eq!(
            archives,
            vec![
                base.join("B.RAR"),
                base.join("a.zip"),
                base.join("nested/disc.iso"),
            ]
        );
    }

    #[test]
    fn test_run_without_archives_writes_header_only() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("root");
        fs::create_dir_all(&root).unwrap();
        let manifest = temp_dir.path().join("manifest.csv");

        let driver = BatchDriver::new(Config::new(["pdf"], Vec::<String>::new()), Arc::default())
            .with_progress(false);
        let summary = driver.run(&root, &manifest).unwrap();

        assert_eq!(summary.archives_found, 0);
        assert_eq!(summary.manifest_rows, 0);
        assert_eq!(fs::read_to_string(&manifest).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_unwritable_manifest_aborts_before_processing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("root");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.zip"), "not extracted yet").unwrap();
        let manifest = temp_dir.path().join("no/such/dir/m.csv");

        let result = create_driver(Arc::default()).run(&root, &manifest);

        assert!(result.is_err());
        assert!(!root.join("a").exists(), "清單無法建立時不應處理任何壓縮檔");
        assert!(root.join("a.zip").exists());
    }

    #[test]
    fn test_interrupt_during_last_archive_skips_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("root");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("only.zip"), "zip").unwrap();
        let manifest = temp_dir.path().join("manifest.csv");

        let shutdown_signal = Arc::new(AtomicBool::new(false));
        let driver = create_driver(Arc::clone(&shutdown_signal));
        let orchestrator = ArchiveOrchestrator::new(&driver.config, Box::new(SilentReporter))
            .with_extractor(
                ArchiveFormat::Zip,
                Box::new(InterruptingExtractor {
                    shutdown_signal: Arc::clone(&shutdown_signal),
                }),
            );
        let archives = BatchDriver::discover_archives(&root);

        let summary = driver
            .process_archives(&orchestrator, &archives, &ProgressBar::hidden(), &manifest)
            .unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.archives_processed, 1);
        assert_eq!(summary.archives_cleaned, 1);
        assert!(summary.manifest_path.is_none());
        assert!(!manifest.exists(), "中斷時不應產生清單");
        assert!(root.join("only/report.pdf").exists());
    }

    #[test]
    fn test_run_invalid_root_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let driver = BatchDriver::new(Config::new(["pdf"], Vec::<String>::new()), Arc::default())
            .with_progress(false);

        let result = driver.run(&temp_dir.path().join("missing"), &temp_dir.path().join("m.csv"));
        assert!(result.is_err());
    }
}
