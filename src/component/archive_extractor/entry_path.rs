use std::path::{Component, Path, PathBuf};

/// 將解碼後的項目名稱接到解壓目錄下
///
/// 絕對路徑或包含 `..` 的名稱會回傳 `None`，避免寫到解壓目錄之外
#[must_use]
pub fn join_entry_path(destination: &Path, entry_name: &str) -> Option<PathBuf> {
    let normalized = entry_name.replace('\\', "/");
    let relative = Path::new(&normalized);

    let mut result = destination.to_path_buf();
    let mut has_component = false;

    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                result.push(part);
                has_component = true;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    has_component.then_some(result)
}
