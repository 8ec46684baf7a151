//! Task reference resolution: pulls a numeric task id out of an utterance.
//!
//! Patterns are tried in order: `task #N` / `task N`, then `#N`, then any
//! bare number. The bare-number fallback means an unrelated number in the
//! sentence (a clock time, a count) can be picked up as an id. Callers
//! echo the resolved id in their replies so a misread is visible to the
//! user.

use std::sync::LazyLock;

use regex::Regex;

static ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"(?i)task\s*#?(\d+)", r"#(\d+)", r"(\d+)"]
        .iter()
        .map(|p| Regex::new(p).expect("invalid regex"))
        .collect()
});

/// Extract a task id from an utterance, or `None` when the utterance
/// contains no digits at all.
pub fn resolve_task_reference(utterance: &str) -> Option<i64> {
    for pattern in ID_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(utterance) {
            if let Ok(id) = caps[1].parse() {
                return Some(id);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_hash_number() {
        assert_eq!(resolve_task_reference("delete task #7"), Some(7));
    }

    #[test]
    fn test_task_number_without_hash() {
        assert_eq!(resolve_task_reference("mark task 12 as done"), Some(12));
        assert_eq!(resolve_task_reference("Task3 is finished"), Some(3));
    }

    #[test]
    fn test_bare_hash() {
        assert_eq!(resolve_task_reference("complete #42"), Some(42));
    }

    #[test]
    fn test_bare_number_fallback() {
        assert_eq!(resolve_task_reference("finish 5 please"), Some(5));
        // Known ambiguity: a clock time reads as an id through the bare
        // fallback.
        assert_eq!(resolve_task_reference("done with the one at 5"), Some(5));
    }

    #[test]
    fn test_no_digits_is_absent() {
        assert_eq!(resolve_task_reference("remove item"), None);
        assert_eq!(resolve_task_reference(""), None);
    }
}
