//! Runtime configuration, sourced from environment variables.

use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server to (`HOST`, default `0.0.0.0`).
    pub host: String,
    /// Port for the HTTP server (`PORT`, default `8080`).
    pub port: u16,
    /// SQLite database file (`TASKPILOT_DB`, default `tasks.db`).
    pub db_path: PathBuf,
    /// OpenRouter API key (`OPENROUTER_API_KEY`). When absent the
    /// conversational fallback uses canned replies instead of an LLM.
    pub openrouter_api_key: Option<String>,
    /// Model for the conversational fallback (`TASKPILOT_MODEL`).
    pub model: String,
}

impl Config {
    /// Build a config from the environment, with defaults for everything
    /// except the API key.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            db_path: std::env::var("TASKPILOT_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("tasks.db")),
            openrouter_api_key: std::env::var("OPENROUTER_API_KEY").ok(),
            model: std::env::var("TASKPILOT_MODEL")
                .unwrap_or_else(|_| "openai/gpt-4o-mini".to_string()),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
