//! Text-generation backend
//!
//! Everything that needs a language model goes through the `LlmClient`
//! trait so the digest and library services can be driven by a stub in
//! tests and by `GeminiClient` in the binary.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by a generation backend
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Model returned no text")]
    EmptyResponse,
}

/// Result type for generation calls
pub type LlmResult<T> = std::result::Result<T, LlmError>;

/// A single generation call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub max_output_tokens: Option<u32>,

    /// JSON schema the response must follow; switches the response to JSON
    pub response_schema: Option<serde_json::Value>,
}

impl GenerationRequest {
    /// Plain-text request with backend defaults
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_sampling(mut self, temperature: f32, top_p: f32, top_k: u32) -> Self {
        self.temperature = Some(temperature);
        self.top_p = Some(top_p);
        self.top_k = Some(top_k);
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    pub fn with_response_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// A text-generation backend
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Whether a credential is available; callers check this before any network work
    fn has_credential(&self) -> bool;

    /// Runs one generation and returns the model's text
    async fn generate(&self, request: &GenerationRequest) -> LlmResult<String>;
}
