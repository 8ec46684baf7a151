//! Crate-wide error taxonomy.
//!
//! "Nothing recognized" is never an error anywhere in the NLU core — absent
//! values and defaults cover those paths. Errors are reserved for invalid
//! input, store failures (propagated verbatim, never retried or masked),
//! and LLM transport failures.

use thiserror::Error;

use crate::llm::LlmError;

#[derive(Debug, Error)]
pub enum Error {
    /// The caller handed us something that is not a usable utterance.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Task store failure, passed through unmodified.
    #[error("task store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Conversational fallback failure.
    #[error("llm error: {0}")]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
