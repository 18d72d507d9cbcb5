use serde::Deserialize;

/// 設定檔預設名稱（位於目前工作目錄）
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// 設定檔的原始內容（反序列化用）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    #[serde(rename = "KeepExtensions", default)]
    pub keep_extensions: Vec<String>,
    #[serde(rename = "Priority", default)]
    pub priority: Vec<String>,
}

/// 正規化後的設定
///
/// 副檔名一律為小寫、不含前導點
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 允許保留的副檔名（有序）
    pub keep_extensions: Vec<String>,
    /// 同名檔案的優先順序，索引越小優先級越高
    pub priority: Vec<String>,
}

impl Config {
    /// 由副檔名清單建立設定
    ///
    /// `priority` 為空時沿用 `keep_extensions` 的順序
    #[must_use]
    pub fn new<K, P>(keep_extensions: K, priority: P) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let keep_extensions = normalize_extensions(keep_extensions);
        let mut priority = normalize_extensions(priority);
        if priority.is_empty() {
            priority.clone_from(&keep_extensions);
        }

        Self {
            keep_extensions,
            priority,
        }
    }

    /// 列出不在保留清單中的優先順序項目（對保留結果沒有影響）
    #[must_use]
    pub fn orphan_priority_entries(&self) -> Vec<&str> {
        self.priority
            .iter()
            .filter(|p| !self.keep_extensions.contains(p))
            .map(String::as_str)
            .collect()
    }
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self::new(raw.keep_extensions, raw.priority)
    }
}

/// 正規化單一副檔名：去除空白、去除一個前導點、轉小寫
#[must_use]
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim();
    trimmed
        .strip_prefix('.')
        .unwrap_or(trimmed)
        .to_lowercase()
}

fn normalize_extensions<I>(items: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut result: Vec<String> = Vec::new();
    for item in items {
        let ext = normalize_extension(item.as_ref());
        if ext.is_empty() || result.contains(&ext) {
            continue;
        }
        result.push(ext);
    }
    result
}
