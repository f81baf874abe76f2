use serde::{Deserialize, Serialize};

/// Default Gemini model used for every LLM call
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// Default Gemini REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Content cap for recursive digests (characters)
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 30_000;

/// Content cap for the single-page digest variant (characters)
pub const DEFAULT_SINGLE_PAGE_MAX_CONTENT_CHARS: usize = 10_000;

/// Main configuration structure for Promma
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub digest: DigestConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// LLM backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Gemini API key; `GEMINI_API_KEY` takes precedence when set
    #[serde(rename = "api-key", default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generative language API
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

/// Storage configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file (defaults to `<config dir>/promma.db`)
    #[serde(rename = "database-path", default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,
}

/// Web digest configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DigestConfig {
    /// Maximum characters of aggregated content sent for a recursive digest
    #[serde(rename = "max-content-chars", default = "default_max_content_chars")]
    pub max_content_chars: usize,

    /// Maximum characters of content sent for a single-page digest
    #[serde(
        rename = "single-page-max-content-chars",
        default = "default_single_page_max_content_chars"
    )]
    pub single_page_max_content_chars: usize,

    /// Timeout for each page fetch in seconds
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// User-Agent header sent with page fetches
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address the prompt API binds to
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            max_content_chars: default_max_content_chars(),
            single_page_max_content_chars: default_single_page_max_content_chars(),
            fetch_timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_max_content_chars() -> usize {
    DEFAULT_MAX_CONTENT_CHARS
}

fn default_single_page_max_content_chars() -> usize {
    DEFAULT_SINGLE_PAGE_MAX_CONTENT_CHARS
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("promma/{}", env!("CARGO_PKG_VERSION"))
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}
