//! ISO 解壓器
//!
//! 透過外部 7-Zip 命令列工具解壓，工具由 PATH 搜尋

use super::decompressor::Decompressor;
use crate::tools::ensure_directory_exists;
use anyhow::{Context, Result, bail};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use sysinfo::System;

/// 超過此大小的 ISO 會記錄警告（不拒絕）
pub const LARGE_ISO_THRESHOLD: u64 = 2 * 1024 * 1024 * 1024;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// 依作業系統決定 7z 命令名稱與替代命令
#[must_use]
pub fn default_seven_zip_candidates() -> Vec<String> {
    if cfg!(windows) {
        vec!["7z.exe".to_string()]
    } else {
        vec!["7z".to_string(), "7za".to_string()]
    }
}

/// 使用 7z 命令的解壓器
#[derive(Debug, Clone)]
pub struct SevenZipDecompressor {
    candidates: Vec<String>,
}

impl Default for SevenZipDecompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl SevenZipDecompressor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            candidates: default_seven_zip_candidates(),
        }
    }

    /// 指定候選命令（依序嘗試）
    #[must_use]
    pub fn with_candidates<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    /// 找出第一個存在於 PATH 中的命令
    pub fn locate(&self) -> Result<PathBuf> {
        for (i, name) in self.candidates.iter().enumerate() {
            if let Ok(path) = which::which(name) {
                if i > 0 {
                    info!("使用替代 7z 命令: {}", path.display());
                }
                return Ok(path);
            }
        }
        bail!(
            "未找到 7z 命令 ({})，請安裝 7-Zip 或 p7zip",
            self.candidates.join(", ")
        )
    }

    fn warn_if_large(source: &Path, size: u64) {
        if size <= LARGE_ISO_THRESHOLD {
            return;
        }

        let mut system = System::new();
        system.refresh_memory();
        warn!(
            "正在處理大 ISO 檔案: {} ({:.2} GB，可用記憶體 {:.2} GB)",
            source.display(),
            size as f64 / GIB,
            system.available_memory() as f64 / GIB
        );
    }
}

impl Decompressor for SevenZipDecompressor {
    fn extract(&self, source: &Path, destination: &Path) -> Result<()> {
        let metadata = fs::metadata(source)
            .with_context(|| format!("無法讀取 ISO 檔案: {}", source.display()))?;
        Self::warn_if_large(source, metadata.len());

        ensure_directory_exists(destination)?;

        let tool = self.locate()?;
        info!("使用 {} 處理: {}", tool.display(), source.display());

        let output = Command::new(&tool)
            .arg("x")
            .arg(source)
            .arg(format!("-o{}", destination.display()))
            .arg("-y")
            .output()
            .with_context(|| format!("無法執行 {}", tool.display()))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            bail!(
                "{} 解壓失敗 ({}): {}",
                tool.display(),
                output.status,
                combined.trim()
            );
        }

        if !combined.trim().is_empty() {
            info!("{} 輸出: {}", tool.display(), combined.trim());
        }

        Ok(())
    }
}
