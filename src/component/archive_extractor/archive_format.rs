use std::fmt;
use std::path::{Path, PathBuf};

/// 支援的壓縮檔格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    Zip,
    Rar,
    Iso,
}

impl ArchiveFormat {
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Zip, Self::Rar, Self::Iso]
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Rar => "rar",
            Self::Iso => "iso",
        }
    }

    /// 依副檔名（不分大小寫）判斷格式
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        Self::all().into_iter().find(|f| f.extension() == ext)
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// 壓縮檔的解壓目錄：去掉副檔名的同名資料夾
#[must_use]
pub fn extraction_dir_for(archive_path: &Path) -> PathBuf {
    archive_path.with_extension("")
}
