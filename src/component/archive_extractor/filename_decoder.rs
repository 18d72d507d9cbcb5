//! 檔名解碼器
//!
//! 壓縮檔內的檔名常以 GB18030 / GBK 編碼寫入而非 UTF-8，
//! 這裡盡力將其轉為正確的 Unicode 字串。
//!
//! 亂碼判斷是啟發式的，誤判（正常檔名被當成亂碼，或反之）是已知限制，
//! 解碼失敗時一律退回原始位元組的寬鬆轉換，不會讓呼叫端失敗。

use encoding_rs::{Encoding, GB18030, GBK};

/// UTF-8 中文被錯誤解讀後常見的片段
const GARBLED_PATTERNS: &[&str] = &[
    "锛\u{FFFD}",
    "鏃\u{FFFD}",
    "骞\u{FFFD}",
    "鏈\u{FFFD}",
    "鐢\u{FFFD}",
    "鍖\u{FFFD}",
    "鍥\u{FFFD}",
    "甯\u{FFFD}",
    "鍦\u{FFFD}",
    "鍗\u{FFFD}",
    "闂\u{FFFD}",
];

/// 亂碼判斷策略
#[derive(Debug, Clone)]
pub struct GarbledTextPolicy {
    patterns: Vec<String>,
    /// 漢字比例超過此值視為亂碼
    cjk_ratio_threshold: f64,
    /// 字元數超過此值才套用比例判斷
    min_length: usize,
}

impl Default for GarbledTextPolicy {
    fn default() -> Self {
        Self {
            patterns: GARBLED_PATTERNS.iter().map(ToString::to_string).collect(),
            cjk_ratio_threshold: 0.8,
            min_length: 10,
        }
    }
}

impl GarbledTextPolicy {
    #[must_use]
    pub fn new(patterns: Vec<String>, cjk_ratio_threshold: f64, min_length: usize) -> Self {
        Self {
            patterns,
            cjk_ratio_threshold,
            min_length,
        }
    }

    /// 字串是否看起來像亂碼
    #[must_use]
    pub fn looks_garbled(&self, text: &str) -> bool {
        if self.patterns.iter().any(|p| text.contains(p.as_str())) {
            return true;
        }

        let total = text.chars().count();
        if total <= self.min_length {
            return false;
        }

        let cjk = text.chars().filter(|c| is_cjk_char(*c)).count();
        cjk as f64 / total as f64 > self.cjk_ratio_threshold
    }
}

/// 是否為 CJK 漢字
#[must_use]
pub const fn is_cjk_char(c: char) -> bool {
    matches!(
        c,
        '\u{3400}'..='\u{4DBF}'
            | '\u{4E00}'..='\u{9FFF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{20000}'..='\u{2FA1F}'
    )
}

/// 檔名解碼器
#[derive(Debug, Clone, Default)]
pub struct FilenameDecoder {
    policy: GarbledTextPolicy,
}

impl FilenameDecoder {
    #[must_use]
    pub const fn new(policy: GarbledTextPolicy) -> Self {
        Self { policy }
    }

    /// 解碼壓縮檔內的原始檔名
    ///
    /// 依序嘗試 UTF-8、GB18030、GBK，皆不通過時回傳原始位元組的寬鬆轉換
    #[must_use]
    pub fn decode(&self, raw: &[u8]) -> String {
        if let Ok(text) = std::str::from_utf8(raw)
            && !self.policy.looks_garbled(text)
        {
            return text.to_string();
        }

        for encoding in [GB18030, GBK] {
            if let Some(decoded) = self.try_decode(encoding, raw) {
                return decoded;
            }
        }

        String::from_utf8_lossy(raw).into_owned()
    }

    fn try_decode(&self, encoding: &'static Encoding, raw: &[u8]) -> Option<String> {
        let decoded = encoding.decode_without_bom_handling_and_without_replacement(raw)?;
        if self.policy.looks_garbled(&decoded) {
            return None;
        }
        Some(decoded.into_owned())
    }
}
