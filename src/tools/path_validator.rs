use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    Ok(())
}

/// 資料夾不存在時建立；路徑已存在但不是資料夾時回傳錯誤
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("無法建立資料夾: {}", path.display()))?;
    } else if !path.is_dir() {
        bail!("路徑已存在但不是資料夾: {}", path.display());
    }
    Ok(())
}

/// 目錄存在且第一層至少有一個非資料夾項目
///
/// 只檢查第一層：只有子資料夾的目錄視為「沒有內容」
#[must_use]
pub fn has_top_level_file(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }

    let Ok(entries) = fs::read_dir(path) else {
        return false;
    };

    entries
        .filter_map(std::result::Result::ok)
        .any(|entry| entry.file_type().is_ok_and(|t| !t.is_dir()))
}
