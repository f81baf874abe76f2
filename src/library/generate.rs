//! Structured prompt generation

use crate::llm::{GenerationRequest, LlmClient};
use crate::storage::NewPrompt;
use crate::{ConfigError, PrommaError, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A prompt as produced by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredPrompt {
    pub title: String,
    pub description: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl StructuredPrompt {
    pub fn into_new_prompt(self, category: Option<String>) -> NewPrompt {
        NewPrompt {
            title: self.title,
            description: Some(self.description),
            content: self.content,
            category,
            tags: Some(self.tags.join(", ")),
        }
    }
}

/// Generation outcome; the raw text is kept when it does not parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedPrompt {
    Structured(StructuredPrompt),
    Raw(String),
}

fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {"type": "STRING"},
            "description": {"type": "STRING"},
            "content": {"type": "STRING"},
            "tags": {"type": "ARRAY", "items": {"type": "STRING"}}
        },
        "required": ["title", "description", "content", "tags"]
    })
}

/// Builds the generation request for a user's description
pub fn generation_request(input: &str) -> GenerationRequest {
    let prompt = format!(
        "You are a prompt-writing assistant. Generate a structured prompt with a title, \
description, content and tags.

Based on the user's description, produce a prompt with:
1. title: short and clear, reflecting the prompt's core purpose
2. description: a brief summary of what the prompt does
3. content: the full prompt text
4. tags: 3-5 relevant tags

Return JSON with this structure:
{{
  \"title\": \"Prompt title\",
  \"description\": \"Short description\",
  \"content\": \"Full prompt content\",
  \"tags\": [\"tag1\", \"tag2\", \"tag3\"]
}}

The user's description:
{}",
        input
    );

    GenerationRequest::new(prompt)
        .with_sampling(0.2, 0.9, 16)
        .with_max_output_tokens(2048)
        .with_response_schema(response_schema())
}

/// Interprets model output as a structured prompt when possible
pub fn parse_generated(text: String) -> GeneratedPrompt {
    match serde_json::from_str::<StructuredPrompt>(text.trim()) {
        Ok(structured) => GeneratedPrompt::Structured(structured),
        Err(e) => {
            tracing::debug!("Generated text is not a structured prompt: {}", e);
            GeneratedPrompt::Raw(text)
        }
    }
}

/// Asks the model for a new prompt matching `input`
pub async fn generate_prompt<L>(llm: &L, input: &str) -> Result<GeneratedPrompt>
where
    L: LlmClient + ?Sized,
{
    if !llm.has_credential() {
        return Err(ConfigError::MissingApiKey.into());
    }
    if input.trim().is_empty() {
        return Err(PrommaError::InvalidInput(
            "description cannot be empty".to_string(),
        ));
    }

    let text = llm.generate(&generation_request(input.trim())).await?;
    Ok(parse_generated(text))
}
