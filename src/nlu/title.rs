//! Title cleanup: strips recognized date/time phrasing out of the original
//! (not lower-cased) text so the stored title reads naturally.
//!
//! Best-effort and purely cosmetic. When nothing matches, the title is the
//! trimmed original text; this pass never fails.

use std::sync::LazyLock;

use regex::Regex;

/// The phrasings the temporal extractor recognizes, as removal patterns.
static REMOVAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\s+by\s+\d{1,2}(?::\d{2})?\s*(?:am|pm)?",
        r"(?i)\s+at\s+\d{1,2}(?::\d{2})?\s*(?:am|pm)?",
        r"(?i)\s+in\s+\d+\s+(?:minutes?|hours?|days?)",
        r"(?i)\s+by\s+tomorrow",
        r"(?i)\s+by\s+today",
        r"(?i)\s+at\s+noon",
        r"(?i)\s+at\s+midnight",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid regex"))
    .collect()
});

/// Remove date/time phrases from `text` and trim the result.
pub fn clean_title(text: &str) -> String {
    let mut cleaned = text.to_string();
    for pattern in REMOVAL_PATTERNS.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    cleaned.trim().to_string()
}
