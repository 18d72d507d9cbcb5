//! 檔案移除（搬移到 `.remove` 資料夾）
//!
//! 檔案不會被直接刪除，而是搬到同目錄下的 `.remove/`，遇到同名時加上數字後綴

use crate::tools::REMOVE_DIR_NAME;
use crate::tools::ensure_directory_exists;
use anyhow::{Context, Result, bail};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// 將檔案搬移到所在目錄的 `.remove/` 下，回傳新路徑
///
/// 目標已存在時依序嘗試 `name_1.ext`、`name_2.ext`…直到找到空位
pub fn relocate_to_remove(file_path: &Path) -> Result<PathBuf> {
    let Some(file_name) = file_path.file_name() else {
        bail!("無效的檔案路徑: {}", file_path.display());
    };
    let parent = file_path.parent().unwrap_or(Path::new("."));
    let remove_dir = parent.join(REMOVE_DIR_NAME);

    ensure_directory_exists(&remove_dir)
        .with_context(|| format!("無法建立 .remove 目錄: {}", remove_dir.display()))?;

    let target_path = next_free_path(&remove_dir, Path::new(file_name));

    if let Err(rename_err) = fs::rename(file_path, &target_path) {
        // rename 失敗（可能跨檔案系統）時改用複製後刪除
        copy_and_delete(file_path, &target_path).with_context(|| {
            format!(
                "無法移動檔案 {} -> {} (原始錯誤: {rename_err})",
                file_path.display(),
                target_path.display()
            )
        })?;
    }

    info!(
        "移動檔案: {} -> {}",
        file_path.display(),
        target_path.display()
    );
    Ok(target_path)
}

/// 在目錄中找出不衝突的檔名
fn next_free_path(directory: &Path, file_name: &Path) -> PathBuf {
    let candidate = directory.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = file_name
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = file_name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter: usize = 1;
    loop {
        let candidate = directory.join(format!("{stem}_{counter}{extension}"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

fn copy_and_delete(source: &Path, target: &Path) -> Result<()> {
    fs::copy(source, target).with_context(|| {
        format!("複製檔案失敗: {} -> {}", source.display(), target.display())
    })?;

    fs::remove_file(source).with_context(|| format!("刪除原檔案失敗: {}", source.display()))?;

    Ok(())
}
