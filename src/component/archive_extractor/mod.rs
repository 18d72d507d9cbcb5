//! 壓縮檔解壓元件
//!
//! 支援 ZIP、RAR 與 ISO（透過外部 7z 工具），並修復以中文舊編碼寫入的檔名

mod archive_format;
mod decompressor;
mod entry_path;
mod filename_decoder;
mod iso_extractor;
mod rar_extractor;
mod zip_extractor;

pub use archive_format::{ArchiveFormat, extraction_dir_for};
pub use decompressor::Decompressor;
pub use entry_path::join_entry_path;
pub use filename_decoder::{FilenameDecoder, GarbledTextPolicy, is_cjk_char};
pub use iso_extractor::{LARGE_ISO_THRESHOLD, SevenZipDecompressor, default_seven_zip_candidates};
pub use rar_extractor::RarExtractor;
pub use zip_extractor::ZipExtractor;
