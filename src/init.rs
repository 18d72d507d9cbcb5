//! 日誌初始化
//!
//! 完整的決策紀錄寫入日誌檔，主控台只顯示每個壓縮檔的摘要

use anyhow::{Context, Result};
use env_logger::{Env, Target, WriteStyle};
use log::info;
use std::fs::File;
use std::path::Path;

/// 預設的日誌檔名稱
pub const DEFAULT_LOG_FILE: &str = "processing.log";

/// 建立日誌檔並將 `log` 輸出導向該檔案
///
/// 預設等級為 info，可用 `RUST_LOG` 調整
pub fn init_logging(log_path: &Path) -> Result<()> {
    let log_file = File::create(log_path)
        .with_context(|| format!("無法建立日誌檔: {}", log_path.display()))?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(log_file)))
        .write_style(WriteStyle::Never)
        .try_init()
        .context("日誌系統已初始化過")?;

    info!("日誌系統已初始化: {}", log_path.display());
    Ok(())
}
