use anyhow::Result;
use std::path::Path;

/// 解壓能力
///
/// 將壓縮檔展開到目的資料夾；任何失敗（格式、I/O、外部工具）都以單一錯誤回報
pub trait Decompressor {
    fn extract(&self, source: &Path, destination: &Path) -> Result<()>;
}
