//! Database ID normalization
//!
//! Accepts a dashed UUID, a bare 32-hex id, or a Notion page URL and returns
//! the canonical dashed UUID form.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("uuid pattern is valid")
});

static HEX32: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[0-9a-f]{32}").expect("hex pattern is valid"));

/// Normalizes a user-supplied database identifier.
///
/// Returns `None` when no identifier can be recovered.
pub fn normalize_database_id(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.len() == 36 && UUID.is_match(raw) {
        return Some(raw.to_string());
    }

    if let Ok(url) = Url::parse(raw) {
        let path = url.path();
        if let Some(hex) = HEX32.find(path) {
            return Some(dashed(&hex.as_str().to_ascii_lowercase()));
        }
        if let Some(uuid) = UUID.find(path) {
            return Some(uuid.as_str().to_string());
        }
    }

    let hex: String = raw
        .to_ascii_lowercase()
        .chars()
        .filter(char::is_ascii_hexdigit)
        .collect();
    (hex.len() == 32).then(|| dashed(&hex))
}

/// Formats 32 hex characters as 8-4-4-4-12.
fn dashed(hex: &str) -> String {
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
