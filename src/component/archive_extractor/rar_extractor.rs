use super::decompressor::Decompressor;
use super::entry_path::join_entry_path;
use super::filename_decoder::FilenameDecoder;
use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use std::fs;
use std::path::Path;
use unrar::Archive;

/// RAR 解壓器
///
/// 依序讀取標頭並逐一解壓，不需要隨機存取。
/// unrar 已自行把標頭檔名轉成 Unicode，這裡的解碼器只會看到合法的 UTF-8，
/// GB18030/GBK 修復實際上只對 ZIP 生效
#[derive(Debug, Clone, Default)]
pub struct RarExtractor {
    decoder: FilenameDecoder,
}

impl RarExtractor {
    #[must_use]
    pub const fn new(decoder: FilenameDecoder) -> Self {
        Self { decoder }
    }
}

impl Decompressor for RarExtractor {
    fn extract(&self, source: &Path, destination: &Path) -> Result<()> {
        let mut archive = Archive::new(source)
            .open_for_processing()
            .map_err(|e| anyhow!("無法開啟 RAR: {}: {e}", source.display()))?;

        while let Some(header) = archive
            .read_header()
            .map_err(|e| anyhow!("無法讀取 RAR 標頭: {}: {e}", source.display()))?
        {
            let entry = header.entry();
            let raw_name = entry.filename.to_string_lossy().to_string();
            let name = self.decoder.decode(raw_name.as_bytes());

            let Some(output_path) = join_entry_path(destination, &name) else {
                warn!("跳過不安全的項目路徑: {name}");
                archive = header
                    .skip()
                    .map_err(|e| anyhow!("無法略過 RAR 項目 {name}: {e}"))?;
                continue;
            };

            if entry.is_directory() {
                fs::create_dir_all(&output_path)
                    .with_context(|| format!("無法建立目錄: {}", output_path.display()))?;
                archive = header
                    .skip()
                    .map_err(|e| anyhow!("無法略過 RAR 項目 {name}: {e}"))?;
                continue;
            }

            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("無法建立目錄: {}", parent.display()))?;
            }

            archive = header
                .extract_to(&output_path)
                .map_err(|e| anyhow!("無法解壓 RAR 項目 {name}: {e}"))?;
            debug!("解壓: {name} -> {}", output_path.display());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_corrupt_rar_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("broken.rar");
        fs::write(&archive, "definitely not a rar archive").unwrap();

        let result = RarExtractor::default().extract(&archive, &temp_dir.path().join("broken"));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_rar_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = RarExtractor::default()
            .extract(&temp_dir.path().join("missing.rar"), temp_dir.path());
        assert!(result.is_err());
    }
}
