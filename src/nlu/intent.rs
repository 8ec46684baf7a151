//! Keyword-driven intent classification for chat utterances.
//!
//! Classification is deliberately simple: fixed keyword sets are tested as
//! case-insensitive substrings in a fixed priority order, and the first set
//! that matches wins. An utterance containing both a create cue and a view
//! cue ("show me how to add a task") classifies as `CreateTask` because the
//! create set is checked first. That precedence is part of the contract.

use serde::{Deserialize, Serialize};

/// The caller's inferred goal category for one chat utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    CreateTask,
    ViewTasks,
    CompleteTask,
    DeleteTask,
    GeneralChat,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateTask => write!(f, "create_task"),
            Self::ViewTasks => write!(f, "view_tasks"),
            Self::CompleteTask => write!(f, "complete_task"),
            Self::DeleteTask => write!(f, "delete_task"),
            Self::GeneralChat => write!(f, "general_chat"),
        }
    }
}

/// One classification rule: an intent and the keywords that select it.
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub intent: Intent,
    pub keywords: Vec<String>,
}

impl IntentRule {
    pub fn new(intent: Intent, keywords: &[&str]) -> Self {
        Self {
            intent,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Classifies utterances by testing rules in order and returning the first
/// intent whose keyword set has a substring match.
///
/// The rule table is explicit configuration rather than a module constant so
/// callers can override keyword sets (per-locale lists, tests) without
/// touching the classifier itself.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a classifier with the default English keyword sets.
    ///
    /// Order matters: create before view before complete before delete.
    pub fn new() -> Self {
        Self::with_rules(vec![
            IntentRule::new(
                Intent::CreateTask,
                &["remind me", "add", "create", "new task", "schedule", "set"],
            ),
            IntentRule::new(
                Intent::ViewTasks,
                &["show", "list", "what", "tasks", "todo", "pending", "due"],
            ),
            IntentRule::new(
                Intent::CompleteTask,
                &["done", "complete", "finished", "mark as done"],
            ),
            IntentRule::new(Intent::DeleteTask, &["delete", "remove", "cancel", "drop"]),
        ])
    }

    /// Create a classifier with a custom rule table, checked in order.
    pub fn with_rules(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    /// Classify an utterance. Total: falls back to `GeneralChat` when no
    /// rule matches.
    pub fn classify(&self, utterance: &str) -> Intent {
        let lowered = utterance.to_lowercase();

        for rule in &self.rules {
            if rule.keywords.iter().any(|k| lowered.contains(k.as_str())) {
                return rule.intent;
            }
        }

        Intent::GeneralChat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_intent() {
        let classifier = IntentClassifier::new();
        assert_eq!(
            classifier.classify("Remind me to call mom at 3 PM"),
            Intent::CreateTask
        );
        assert_eq!(
            classifier.classify("add buy milk to my list"),
            Intent::CreateTask
        );
        assert_eq!(
            classifier.classify("Schedule a dentist appointment"),
            Intent::CreateTask
        );
    }

    #[test]
    fn test_view_intent() {
        let classifier = IntentClassifier::new();
        assert_eq!(classifier.classify("what's on my todo?"), Intent::ViewTasks);
        assert_eq!(classifier.classify("list everything"), Intent::ViewTasks);
    }

    #[test]
    fn test_complete_intent() {
        let classifier = IntentClassifier::new();
        assert_eq!(classifier.classify("I'm done with #3"), Intent::CompleteTask);
        assert_eq!(
            classifier.classify("mark as done: groceries"),
            Intent::CompleteTask
        );
    }

    #[test]
    fn test_delete_intent() {
        let classifier = IntentClassifier::new();
        assert_eq!(classifier.classify("delete task 7"), Intent::DeleteTask);
        assert_eq!(classifier.classify("cancel the meeting one"), Intent::DeleteTask);
    }

    #[test]
    fn test_general_chat_fallback() {
        let classifier = IntentClassifier::new();
        assert_eq!(classifier.classify("how are you?"), Intent::GeneralChat);
        assert_eq!(classifier.classify(""), Intent::GeneralChat);
    }

    #[test]
    fn test_create_takes_precedence_over_view() {
        // "show" is a view keyword and "add" is a create keyword; the create
        // rule is checked first, so create wins. Intentional, not a bug.
        let classifier = IntentClassifier::new();
        assert_eq!(
            classifier.classify("show me how to add a task"),
            Intent::CreateTask
        );
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        let classifier = IntentClassifier::new();
        assert_eq!(classifier.classify("DELETE TASK 2"), Intent::DeleteTask);
        assert_eq!(classifier.classify("Show My Tasks"), Intent::ViewTasks);
    }

    #[test]
    fn test_custom_rules() {
        let classifier = IntentClassifier::with_rules(vec![IntentRule::new(
            Intent::DeleteTask,
            &["yeet"],
        )]);
        assert_eq!(classifier.classify("yeet task 4"), Intent::DeleteTask);
        assert_eq!(classifier.classify("add something"), Intent::GeneralChat);
    }
}
