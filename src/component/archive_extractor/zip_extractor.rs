use super::decompressor::Decompressor;
use super::entry_path::join_entry_path;
use super::filename_decoder::FilenameDecoder;
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use zip::ZipArchive;

/// ZIP 解壓器
#[derive(Debug, Clone, Default)]
pub struct ZipExtractor {
    decoder: FilenameDecoder,
}

impl ZipExtractor {
    #[must_use]
    pub const fn new(decoder: FilenameDecoder) -> Self {
        Self { decoder }
    }
}

impl Decompressor for ZipExtractor {
    fn extract(&self, source: &Path, destination: &Path) -> Result<()> {
        let file = File::open(source)
            .with_context(|| format!("無法開啟壓縮檔: {}", source.display()))?;
        let mut archive = ZipArchive::new(BufReader::new(file))
            .with_context(|| format!("無效或損壞的 ZIP: {}", source.display()))?;

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .with_context(|| format!("無法讀取第 {i} 個項目: {}", source.display()))?;

            let name = self.decoder.decode(entry.name_raw());
            let Some(output_path) = join_entry_path(destination, &name) else {
                warn!("跳過不安全的項目路徑: {name}");
                continue;
            };

            if entry.is_dir() {
                fs::create_dir_all(&output_path)
                    .with_context(|| format!("無法建立目錄: {}", output_path.display()))?;
                continue;
            }

            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("無法建立目錄: {}", parent.display()))?;
            }

            let mut output = File::create(&output_path)
                .with_context(|| format!("無法建立檔案: {}", output_path.display()))?;
            io::copy(&mut entry, &mut output)
                .with_context(|| format!("無法寫入檔案: {}", output_path.display()))?;
            drop(output);

            apply_permissions(&output_path, entry.unix_mode());
            debug!("解壓: {name} -> {}", output_path.display());
        }

        Ok(())
    }
}

#[cfg(unix)]
fn apply_permissions(path: &Path, mode: Option<u32>) {
    use std::os::unix::fs::PermissionsExt;

    let Some(mode) = mode.map(|m| m & 0o7777).filter(|m| *m != 0) else {
        return;
    };
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(mode)) {
        warn!("無法設定權限 {}: {e}", path.display());
    }
}

#[cfg(not(unix))]
fn apply_permissions(_path: &Path, _mode: Option<u32>) {}
