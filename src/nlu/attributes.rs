//! Priority and description extraction.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Task priority level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse a stored priority string. Unknown values fall back to medium.
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One priority rule: keywords that select a level.
#[derive(Debug, Clone)]
pub struct PriorityRule {
    pub priority: Priority,
    pub keywords: Vec<String>,
}

impl PriorityRule {
    pub fn new(priority: Priority, keywords: &[&str]) -> Self {
        Self {
            priority,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Ordered priority keyword table. High is checked before medium before
/// low, and the first substring match wins.
#[derive(Debug, Clone)]
pub struct PriorityMatcher {
    rules: Vec<PriorityRule>,
}

impl Default for PriorityMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityMatcher {
    pub fn new() -> Self {
        Self::with_rules(vec![
            PriorityRule::new(
                Priority::High,
                &["urgent", "asap", "immediately", "critical", "important", "high"],
            ),
            PriorityRule::new(Priority::Medium, &["normal", "regular", "medium"]),
            PriorityRule::new(Priority::Low, &["low", "later", "whenever", "optional"]),
        ])
    }

    pub fn with_rules(rules: Vec<PriorityRule>) -> Self {
        Self { rules }
    }

    /// Scan for a priority keyword. Absent when nothing matches; the caller
    /// defaults to medium.
    pub fn extract(&self, text: &str) -> Option<Priority> {
        let lowered = text.to_lowercase();
        for rule in &self.rules {
            if rule.keywords.iter().any(|k| lowered.contains(k.as_str())) {
                return Some(rule.priority);
            }
        }
        None
    }
}

static TO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)to\s+(.+?)(?:\s+by|\s+at|\s+in|$)").expect("invalid regex")
});
static ABOUT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)about\s+(.+?)(?:\s+by|\s+at|\s+in|$)").expect("invalid regex")
});

/// Extract a description fragment: `to <text>` first, then `about <text>`,
/// stopping before a by/at/in clause. Empty string when neither matches.
pub fn extract_description(text: &str) -> String {
    for pattern in [&TO_PATTERN, &ABOUT_PATTERN] {
        if let Some(caps) = pattern.captures(text) {
            return caps[1].trim().to_string();
        }
    }
    String::new()
}
