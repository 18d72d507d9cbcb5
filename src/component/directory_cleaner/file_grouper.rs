//! 檔案分組器
//!
//! 將可保留的檔案依「所在目錄 + 不含副檔名的檔名」分組，
//! 不可保留的檔案另外列出，不參與分組

use crate::tools::{ExtensionClassifier, stem_of};
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 分組鍵：所在目錄與不含副檔名的檔名
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub directory: PathBuf,
    pub stem: String,
}

impl GroupKey {
    #[must_use]
    pub fn of(path: &Path) -> Self {
        Self {
            directory: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            stem: stem_of(path),
        }
    }
}

/// 檔案分組資訊
#[derive(Debug, Clone)]
pub struct FileGroup {
    pub key: GroupKey,
    /// 屬於此群組的檔案路徑（依掃描順序）
    pub files: Vec<PathBuf>,
}

impl FileGroup {
    /// 群組只有一個檔案，不需要比較優先級
    #[must_use]
    pub const fn is_single(&self) -> bool {
        self.files.len() == 1
    }
}

/// 分組結果
#[derive(Debug, Default)]
pub struct GroupedFiles {
    /// 可保留檔案的群組（依第一次出現的順序）
    pub groups: Vec<FileGroup>,
    /// 副檔名不在保留清單中的檔案
    pub non_keep_files: Vec<PathBuf>,
}

impl GroupedFiles {
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.groups.iter().map(|g| g.files.len()).sum::<usize>() + self.non_keep_files.len()
    }
}

/// 檔案分組器
pub struct FileGrouper<'a> {
    classifier: &'a ExtensionClassifier,
}

impl<'a> FileGrouper<'a> {
    #[must_use]
    pub const fn new(classifier: &'a ExtensionClassifier) -> Self {
        Self { classifier }
    }

    /// 將檔案清單分組
    #[must_use]
    pub fn group(&self, files: Vec<PathBuf>) -> GroupedFiles {
        let mut result = GroupedFiles::default();
        let mut index: HashMap<GroupKey, usize> = HashMap::new();

        for path in files {
            if !self.classifier.is_keep_file(&path) {
                info!("發現非保留檔案: {}", path.display());
                result.non_keep_files.push(path);
                continue;
            }

            let key = GroupKey::of(&path);
            info!(
                "發現保留檔案: {} (分組鍵: {})",
                path.display(),
                key.directory.join(&key.stem).display()
            );

            match index.get(&key) {
                Some(&i) => result.groups[i].files.push(path),
                None => {
                    index.insert(key.clone(), result.groups.len());
                    result.groups.push(FileGroup {
                        key,
                        files: vec![path],
                    });
                }
            }
        }

        info!(
            "分組完成: {} 個群組，{} 個非保留檔案",
            result.groups.len(),
            result.non_keep_files.len()
        );

        result
    }
}
