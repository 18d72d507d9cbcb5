//! 壓縮檔處理流程
//!
//! 單一壓縮檔的狀態機：檢查既有解壓結果 → 解壓 → 失敗時嘗試復原 → 清理 → 產生清單

use super::reporter::ArchiveReporter;
use crate::component::archive_extractor::{
    ArchiveFormat, Decompressor, FilenameDecoder, GarbledTextPolicy, RarExtractor,
    SevenZipDecompressor, ZipExtractor, extraction_dir_for,
};
use crate::component::directory_cleaner::{CleanStats, DirectoryCleaner};
use crate::config::Config;
use crate::tools::{ensure_directory_exists, has_top_level_file, scan_all_files};
use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 檔案清單中的一列
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub filename: String,
    pub filepath: String,
    pub source_archive_name: String,
    pub source_archive_path: String,
}

/// 處理狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveState {
    CheckExisting,
    AlreadyExtracted,
    NeedsExtraction,
    ExtractOk,
    ExtractFailed,
    /// 解壓失敗但目錄中已有內容
    Recoverable,
    /// 解壓失敗且沒有內容，不做清理
    Unrecoverable,
    Cleaned,
}

impl ArchiveState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cleaned | Self::Unrecoverable)
    }
}

/// 單一壓縮檔的處理結果
#[derive(Debug)]
pub struct ArchiveReport {
    pub archive: PathBuf,
    pub extraction_dir: PathBuf,
    /// 經過的狀態（依序）
    pub states: Vec<ArchiveState>,
    pub extraction_error: Option<String>,
    pub stats: Option<CleanStats>,
    pub entries: Vec<ManifestEntry>,
}

impl ArchiveReport {
    #[must_use]
    pub fn final_state(&self) -> ArchiveState {
        self.states
            .last()
            .copied()
            .unwrap_or(ArchiveState::CheckExisting)
    }

    #[must_use]
    pub fn passed_through(&self, state: ArchiveState) -> bool {
        self.states.contains(&state)
    }
}

/// 壓縮檔處理器
pub struct ArchiveOrchestrator {
    cleaner: DirectoryCleaner,
    extractors: HashMap<ArchiveFormat, Box<dyn Decompressor>>,
    reporter: Box<dyn ArchiveReporter>,
}

impl ArchiveOrchestrator {
    #[must_use]
    pub fn new(config: &Config, reporter: Box<dyn ArchiveReporter>) -> Self {
        let decoder = FilenameDecoder::new(GarbledTextPolicy::default());
        let mut extractors: HashMap<ArchiveFormat, Box<dyn Decompressor>> = HashMap::new();
        extractors.insert(ArchiveFormat::Zip, Box::new(ZipExtractor::new(decoder.clone())));
        extractors.insert(ArchiveFormat::Rar, Box::new(RarExtractor::new(decoder)));
        extractors.insert(ArchiveFormat::Iso, Box::new(SevenZipDecompressor::new()));

        Self {
            cleaner: DirectoryCleaner::new(config),
            extractors,
            reporter,
        }
    }

    /// 替換指定格式的解壓器
    #[must_use]
    pub fn with_extractor(mut self, format: ArchiveFormat, extractor: Box<dyn Decompressor>) -> Self {
        self.extractors.insert(format, extractor);
        self
    }

    /// 處理單一壓縮檔，回傳清理後保留的檔案清單
    pub fn process(&self, archive: &Path) -> ArchiveReport {
        info!("正在處理: {}", archive.display());

        let mut report = ArchiveReport {
            archive: archive.to_path_buf(),
            extraction_dir: extraction_dir_for(archive),
            states: vec![ArchiveState::CheckExisting],
            extraction_error: None,
            stats: None,
            entries: Vec::new(),
        };

        let mut state = ArchiveState::CheckExisting;
        while !state.is_terminal() {
            state = self.transition(state, &mut report);
            report.states.push(state);
        }

        if state == ArchiveState::Cleaned {
            self.clean_and_collect(&mut report);
        }

        report
    }

    fn transition(&self, state: ArchiveState, report: &mut ArchiveReport) -> ArchiveState {
        let archive = report.archive.as_path();
        let dir = report.extraction_dir.as_path();

        match state {
            ArchiveState::CheckExisting => {
                if has_top_level_file(dir) {
                    ArchiveState::AlreadyExtracted
                } else {
                    ArchiveState::NeedsExtraction
                }
            }
            ArchiveState::AlreadyExtracted => {
                info!("目錄已存在且有內容，跳過解壓直接清理: {}", dir.display());
                self.reporter.found_existing(archive);
                ArchiveState::Cleaned
            }
            ArchiveState::NeedsExtraction => {
                self.reporter.extraction_started(archive);
                match self.extract(archive, dir) {
                    Ok(()) => ArchiveState::ExtractOk,
                    Err(e) => {
                        let reason = format!("{e:#}");
                        warn!("解壓 {} 失敗: {reason}", archive.display());
                        self.reporter.extraction_failed(archive, &reason);
                        report.extraction_error = Some(reason);
                        ArchiveState::ExtractFailed
                    }
                }
            }
            ArchiveState::ExtractOk => {
                info!("成功解壓: {}", archive.display());
                ArchiveState::Cleaned
            }
            ArchiveState::ExtractFailed => {
                if has_top_level_file(dir) {
                    ArchiveState::Recoverable
                } else {
                    ArchiveState::Unrecoverable
                }
            }
            ArchiveState::Recoverable => {
                info!("解壓失敗但目錄有內容，執行清理: {}", dir.display());
                ArchiveState::Cleaned
            }
            ArchiveState::Unrecoverable | ArchiveState::Cleaned => state,
        }
    }

    fn extract(&self, archive: &Path, dir: &Path) -> Result<()> {
        ensure_directory_exists(dir)
            .with_context(|| format!("無法為 {} 建立解壓目錄", archive.display()))?;

        let Some(format) = ArchiveFormat::from_path(archive) else {
            info!("不支援的壓縮格式，略過解壓: {}", archive.display());
            return Ok(());
        };

        match self.extractors.get(&format) {
            Some(extractor) => {
                info!("使用 {format} 解壓器: {}", archive.display());
                extractor.extract(archive, dir)
            }
            None => {
                info!("未註冊 {format} 解壓器，略過解壓: {}", archive.display());
                Ok(())
            }
        }
    }

    fn clean_and_collect(&self, report: &mut ArchiveReport) {
        let stats = self.cleaner.clean(&report.extraction_dir);
        report.entries = collect_manifest_entries(&report.archive, &report.extraction_dir);

        let freshly_extracted = report.passed_through(ArchiveState::ExtractOk);
        self.reporter.cleaned(&report.archive, &stats, freshly_extracted);
        report.stats = Some(stats);
    }
}

/// 重新掃描解壓目錄，為每個保留下來的檔案建立清單列
#[must_use]
pub fn collect_manifest_entries(archive: &Path, extraction_dir: &Path) -> Vec<ManifestEntry> {
    let archive_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut entries = Vec::new();
    for file in scan_all_files(extraction_dir) {
        let (absolute_file, absolute_archive) =
            match (std::path::absolute(&file), std::path::absolute(archive)) {
                (Ok(f), Ok(a)) => (f, a),
                _ => {
                    warn!("無法取得絕對路徑，跳過檔案: {}", file.display());
                    continue;
                }
            };

        entries.push(ManifestEntry {
            filename: file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            filepath: absolute_file.to_string_lossy().to_string(),
            source_archive_name: archive_name.clone(),
            source_archive_path: absolute_archive.to_string_lossy().to_string(),
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::archive_orchestrator::SilentReporter;
    use anyhow::bail;
    use std::cell::{Cell, RefCell};
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// 寫入指定檔案後回傳失敗的假解壓器
    struct FakeExtractor {
        files: Vec<&'static str>,
        fail: bool,
        calls: Rc<Cell<usize>>,
    }

    impl Decompressor for FakeExtractor {
        fn extract(&self, _source: &Path, destination: &Path) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            for name in &self.files {
                let path = destination.join(name);
                fs::create_dir_all(path.parent().unwrap())?;
                fs::write(path, name)?;
            }
            if self.fail {
                bail!("壓縮檔損壞");
            }
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    struct RecordingReporter {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl ArchiveReporter for RecordingReporter {
        fn extraction_started(&self, _archive: &Path) {
            self.events.borrow_mut().push("started".to_string());
        }
        fn found_existing(&self, _archive: &Path) {
            self.events.borrow_mut().push("existing".to_string());
        }
        fn extraction_failed(&self, _archive: &Path, reason: &str) {
            self.events.borrow_mut().push(format!("failed: {reason}"));
        }
        fn cleaned(&self, _archive: &Path, stats: &CleanStats, freshly_extracted: bool) {
            self.events.borrow_mut().push(format!(
                "cleaned {} {} {freshly_extracted}",
                stats.kept_files, stats.removed_files
            ));
        }
    }

    fn config() -> Config {
        Config::new(["pdf", "docx"], Vec::<String>::new())
    }

    fn fake(files: Vec<&'static str>, fail: bool) -> (Box<dyn Decompressor>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let extractor = FakeExtractor {
            files,
            fail,
            calls: Rc::clone(&calls),
        };
        (Box::new(extractor), calls)
    }

    #[test]
    fn test_successful_extraction_path() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("disc.iso");
        fs::write(&archive, "iso").unwrap();

        let reporter = RecordingReporter::default();
        let (extractor, calls) = fake(vec!["report.pdf", "report.docx", "notes.txt"], false);
        let orchestrator = ArchiveOrchestrator::new(&config(), Box::new(reporter.clone()))
            .with_extractor(ArchiveFormat::Iso, extractor);

        let report = orchestrator.process(&archive);

        assert_eq!(calls.get(), 1);
        assert_eq!(
            report.states,
            vec![
                ArchiveState::CheckExisting,
                ArchiveState::NeedsExtraction,
                ArchiveState::ExtractOk,
                ArchiveState::Cleaned,
            ]
        );
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].filename, "report.pdf");
        assert_eq!(report.entries[0].source_archive_name, "disc.iso");
        assert_eq!(
            *reporter.events.borrow(),
            vec!["started".to_string(), "cleaned 1 2 true".to_string()]
        );
    }

    #[test]
    fn test_already_extracted_skips_extraction() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("disc.iso");
        fs::write(&archive, "iso").unwrap();
        fs::create_dir_all(temp_dir.path().join("disc")).unwrap();
        fs::write(temp_dir.path().join("disc/manual.pdf"), "pdf").unwrap();

        let (extractor, calls) = fake(vec![], false);
        let orchestrator = ArchiveOrchestrator::new(&config(), Box::new(SilentReporter))
            .with_extractor(ArchiveFormat::Iso, extractor);

        let report = orchestrator.process(&archive);

        assert_eq!(calls.get(), 0);
        assert!(report.passed_through(ArchiveState::AlreadyExtracted));
        assert_eq!(report.final_state(), ArchiveState::Cleaned);
        assert_eq!(report.entries.len(), 1);
    }

    #[test]
    fn test_nested_only_directory_is_not_already_extracted() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("disc.iso");
        fs::write(&archive, "iso").unwrap();
        fs::create_dir_all(temp_dir.path().join("disc/nested")).unwrap();
        fs::write(temp_dir.path().join("disc/nested/manual.pdf"), "pdf").unwrap();

        let (extractor, calls) = fake(vec!["manual.pdf"], false);
        let orchestrator = ArchiveOrchestrator::new(&config(), Box::new(SilentReporter))
            .with_extractor(ArchiveFormat::Iso, extractor);

        let report = orchestrator.process(&archive);

        // 只檢查第一層，所以仍會重新解壓到同一目錄
        assert_eq!(calls.get(), 1);
        assert!(report.passed_through(ArchiveState::NeedsExtraction));
        assert_eq!(report.entries.len(), 2);
    }

    #[test]
    fn test_failed_extraction_with_content_is_recoverable() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("disc.iso");
        fs::write(&archive, "iso").unwrap();

        let reporter = RecordingReporter::default();
        let (extractor, _) = fake(vec!["partial.pdf", "junk.tmp"], true);
        let orchestrator = ArchiveOrchestrator::new(&config(), Box::new(reporter.clone()))
            .with_extractor(ArchiveFormat::Iso, extractor);

        let report = orchestrator.process(&archive);

        assert_eq!(
            report.states,
            vec![
                ArchiveState::CheckExisting,
                ArchiveState::NeedsExtraction,
                ArchiveState::ExtractFailed,
                ArchiveState::Recoverable,
                ArchiveState::Cleaned,
            ]
        );
        assert!(report.extraction_error.unwrap().contains("壓縮檔損壞"));
        assert_eq!(report.entries.len(), 1);
        assert!(temp_dir.path().join("disc/.remove/junk.tmp").exists());
        assert_eq!(
            reporter.events.borrow().last().unwrap(),
            "cleaned 1 1 false"
        );
    }

    #[test]
    fn test_failed_extraction_without_content_is_unrecoverable() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("disc.iso");
        fs::write(&archive, "iso").unwrap();

        let (extractor, _) = fake(vec![], true);
        let orchestrator = ArchiveOrchestrator::new(&config(), Box::new(SilentReporter))
            .with_extractor(ArchiveFormat::Iso, extractor);

        let report = orchestrator.process(&archive);

        assert_eq!(report.final_state(), ArchiveState::Unrecoverable);
        assert!(report.entries.is_empty());
        assert!(report.stats.is_none());
    }

    #[test]
    fn test_corrupt_zip_without_content_is_unrecoverable() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("broken.zip");
        fs::write(&archive, "not a zip").unwrap();

        let orchestrator = ArchiveOrchestrator::new(&config(), Box::new(SilentReporter));
        let report = orchestrator.process(&archive);

        assert_eq!(report.final_state(), ArchiveState::Unrecoverable);
        assert!(report.extraction_error.is_some());
        assert!(report.entries.is_empty());
    }

    #[test]
    fn test_unknown_format_is_noop_extraction() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("bundle.7z");
        fs::write(&archive, "7z").unwrap();

        let orchestrator = ArchiveOrchestrator::new(&config(), Box::new(SilentReporter));
        let report = orchestrator.process(&archive);

        assert!(report.passed_through(ArchiveState::ExtractOk));
        assert_eq!(report.final_state(), ArchiveState::Cleaned);
        assert!(report.entries.is_empty());
        assert!(temp_dir.path().join("bundle").is_dir());
    }

    #[test]
    fn test_collect_manifest_entries_skips_remove_dir() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("a");
        fs::create_dir_all(dir.join(".remove")).unwrap();
        fs::write(dir.join("keep.pdf"), "k").unwrap();
        fs::write(dir.join(".remove/gone.txt"), "g").unwrap();

        let entries = collect_manifest_entries(&temp_dir.path().join("a.zip"), &dir);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].filename, "keep.pdf");
        assert!(Path::new(&entries[0].filepath).is_absolute());
        assert!(Path::new(&entries[0].source_archive_path).is_absolute());
        assert_eq!(entries[0].source_archive_name, "a.zip");
    }
}
