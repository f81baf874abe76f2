//! Promma: a personal prompt library with LLM-assisted tooling
//!
//! This crate stores prompts and web digests in a local SQLite database and
//! talks to a Gemini-compatible LLM for prompt generation, semantic search and
//! summarization. The digest subsystem crawls a page (and optionally its
//! same-domain links to a bounded depth), summarizes the result and lets the
//! user navigate the crawl results interactively.

pub mod config;
pub mod crawler;
pub mod digest;
pub mod library;
pub mod llm;
pub mod output;
pub mod server;
pub mod storage;
pub mod ui;
pub mod url;

use thiserror::Error;

/// Main error type for Promma operations
#[derive(Debug, Error)]
pub enum PrommaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("LLM error: {0}")]
    Llm(#[from] llm::LlmError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("No content could be extracted from {url} or any page reachable from it")]
    EmptyContent { url: String },

    #[error("Prompt library is empty")]
    EmptyLibrary,

    #[error("Prompt not found: {0}")]
    PromptNotFound(i64),

    #[error("History entry not found: {0}")]
    HistoryNotFound(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("No Gemini API key configured; set GEMINI_API_KEY or run `promma config`")]
    MissingApiKey,

    #[error("Could not determine a home directory for the config directory")]
    NoHomeDir,
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Promma operations
pub type Result<T> = std::result::Result<T, PrommaError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use digest::{DigestOutcome, DigestService, DigestedPage, NavigationState};
pub use storage::{SqliteStorage, Storage};
pub use self::url::{is_same_domain, parse_seed_url};
