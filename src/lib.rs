//! # Taskpilot
//!
//! A personal task assistant with a natural-language front end.
//!
//! Free-text chat utterances are classified into intents (create, view,
//! complete, delete, chat) and, for creates, parsed into structured task
//! records: title, due date, priority, description. Tasks live in SQLite;
//! anything that isn't a task operation is handed to an LLM-backed
//! conversational fallback.
//!
//! ## Flow
//! 1. An utterance arrives via the HTTP chat endpoint
//! 2. The intent classifier routes it
//! 3. Creates run through the task parser (temporal + attribute extraction)
//! 4. The store persists; the reply carries the structured result
//!
//! ## Modules
//! - `nlu`: the pure parsing core (no I/O, explicit reference time)
//! - `store`: SQLite persistence
//! - `assistant`: intent routing and conversation memory
//! - `llm`: chat-completion client for the conversational fallback
//! - `api`: axum HTTP surface
//! - `quotes`: context-aware motivational quotes for the dashboard

pub mod api;
pub mod assistant;
pub mod config;
pub mod error;
pub mod llm;
pub mod nlu;
pub mod quotes;
pub mod store;

pub use assistant::{Assistant, AssistantReply, ReplyAction};
pub use config::Config;
pub use error::Error;
pub use nlu::{Intent, IntentClassifier, ParsedTask, Priority, TaskParser};
pub use store::{TaskRecord, TaskStatus, TaskStore, TaskSummary};
