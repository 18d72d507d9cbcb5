//! 批次處理元件
//!
//! 依序處理根目錄下的所有壓縮檔並產生檔案清單

mod main;
mod manifest_writer;

pub use main::{BatchDriver, BatchSummary};
pub use manifest_writer::{
    DEFAULT_MANIFEST_FILE, MANIFEST_HEADER, ensure_manifest_writable, write_manifest,
};
