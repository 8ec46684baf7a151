//! Natural-language understanding core.
//!
//! Turns a free-text chat utterance into structured task data. Everything
//! in this module is a pure function of the input text and a caller-supplied
//! reference time: no I/O, no wall-clock reads, no shared state. The
//! persistent store and the LLM fallback are external collaborators that
//! consume what this module produces.
//!
//! - `intent`: keyword router over {create, view, complete, delete, chat}
//! - `temporal`: time/date expression extraction and resolution
//! - `attributes`: priority keywords and description fragments
//! - `title`: cosmetic removal of date phrasing from the task title
//! - `reference`: numeric task-id extraction

pub mod attributes;
pub mod intent;
pub mod reference;
pub mod temporal;
pub mod title;

pub use attributes::{extract_description, Priority, PriorityMatcher, PriorityRule};
pub use intent::{Intent, IntentClassifier, IntentRule};
pub use reference::resolve_task_reference;
pub use temporal::extract_due_date;
pub use title::clean_title;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A structured task record produced from one parse call.
///
/// Ephemeral and owned by the caller; nothing here is persisted by the
/// parser itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTask {
    /// Cleaned task text. Never empty: defaults to the raw input, trimmed.
    pub title: String,
    /// Extracted description fragment; may be empty.
    pub description: String,
    /// Absolute due timestamp, absent when no temporal expression was
    /// recognized.
    pub due_date: Option<NaiveDateTime>,
    /// Defaults to medium when no priority keyword is present.
    pub priority: Priority,
}

/// Orchestrates the extractors into one `ParsedTask`.
///
/// Deterministic for a given `(utterance, now)` pair.
#[derive(Debug, Clone, Default)]
pub struct TaskParser {
    priorities: PriorityMatcher,
}

impl TaskParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom priority keyword table.
    pub fn with_priority_rules(rules: Vec<PriorityRule>) -> Self {
        Self {
            priorities: PriorityMatcher::with_rules(rules),
        }
    }

    /// Parse an utterance into a structured task.
    ///
    /// Extraction order is fixed: due date, then title cleanup (only when a
    /// date was found), then priority, then description. An empty or
    /// whitespace-only utterance is rejected as invalid input; every other
    /// "nothing recognized" case is a normal default, never an error.
    pub fn parse(&self, utterance: &str, now: NaiveDateTime) -> Result<ParsedTask, Error> {
        let trimmed = utterance.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("empty utterance".into()));
        }

        // Second precision throughout; the reference time may carry nanos.
        let now = now.with_nanosecond(0).unwrap_or(now);

        let due_date = extract_due_date(utterance, now);

        let title = if due_date.is_some() {
            let cleaned = clean_title(utterance);
            if cleaned.is_empty() {
                trimmed.to_string()
            } else {
                cleaned
            }
        } else {
            trimmed.to_string()
        };

        let priority = self.priorities.extract(utterance).unwrap_or_default();
        let description = extract_description(utterance);

        Ok(ParsedTask {
            title,
            description,
            due_date,
            priority,
        })
    }
}
