use crate::component::archive_orchestrator::ManifestEntry;
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs::{self, OpenOptions};
use std::path::Path;

/// 預設的檔案清單名稱
pub const DEFAULT_MANIFEST_FILE: &str = "file_manifest.csv";

/// 清單欄位
pub const MANIFEST_HEADER: [&str; 4] = [
    "filename",
    "filepath",
    "source_archive_name",
    "source_archive_path",
];

/// 確認清單檔案可以建立
///
/// 以附加模式開啟目標檔案：原本就存在的檔案內容不變，原本不存在的會立即刪除
pub fn ensure_manifest_writable(path: &Path) -> Result<()> {
    let existed = path.exists();
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("無法建立清單檔案: {}", path.display()))?;

    if !existed {
        fs::remove_file(path)
            .with_context(|| format!("無法刪除測試用的清單檔案: {}", path.display()))?;
    }

    debug!("清單檔案可寫入: {}", path.display());
    Ok(())
}

/// 將清單寫成 CSV（第一列為標題）
pub fn write_manifest(path: &Path, entries: &[ManifestEntry]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("無法建立清單檔案: {}", path.display()))?;

    writer.write_record(MANIFEST_HEADER)?;
    for entry in entries {
        writer
            .serialize(entry)
            .with_context(|| format!("無法寫入清單列: {}", entry.filepath))?;
    }
    writer
        .flush()
        .with_context(|| format!("無法寫入清單檔案: {}", path.display()))?;

    info!("檔案清單 '{}' 已成功產生，共 {} 列", path.display(), entries.len());
    Ok(())
}
