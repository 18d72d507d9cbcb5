use crate::config::types::{Config, RawConfig};
use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::Path;

impl Config {
    /// 從 TOML 設定檔載入設定
    ///
    /// 讀取或解析失敗皆為致命錯誤，由呼叫端終止整個流程
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("無法讀取設定檔: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("無法解析設定檔: {}", path.display()))
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        let config = Self::from(raw);

        if config.keep_extensions.is_empty() {
            warn!("KeepExtensions 為空，所有檔案都將被移除");
        }
        let orphans = config.orphan_priority_entries();
        if !orphans.is_empty() {
            warn!("Priority 中的副檔名不在 KeepExtensions 內，將被忽略: {orphans:?}");
        }

        info!(
            "設定載入成功: KeepExtensions={:?}, Priority={:?}",
            config.keep_extensions, config.priority
        );

        Ok(config)
    }
}
