//! Semantic search over the prompt library

use crate::llm::{GenerationRequest, LlmClient};
use crate::storage::PromptRecord;
use crate::{ConfigError, PrommaError, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Results returned when no limit is given
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Characters of prompt content sent to the model
pub const PREVIEW_CHARS: usize = 150;

/// Compact view of a prompt sent to the model
#[derive(Debug, Serialize)]
struct PromptPreview<'a> {
    id: i64,
    title: &'a str,
    description: &'a str,
    preview: String,
    category: &'a str,
    tags: &'a str,
}

impl<'a> From<&'a PromptRecord> for PromptPreview<'a> {
    fn from(prompt: &'a PromptRecord) -> Self {
        Self {
            id: prompt.id,
            title: &prompt.title,
            description: prompt.description.as_deref().unwrap_or(""),
            preview: prompt.content.chars().take(PREVIEW_CHARS).collect(),
            category: &prompt.category,
            tags: prompt.tags.as_deref().unwrap_or(""),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    // Numbers may come back as floats
    id: f64,
    relevance: f64,
    #[serde(default)]
    reason: String,
}

/// A library prompt matched by the model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPrompt {
    pub prompt: PromptRecord,
    pub relevance: f64,
    pub reason: String,
}

fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "results": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": {"type": "NUMBER"},
                        "relevance": {"type": "NUMBER"},
                        "reason": {"type": "STRING"}
                    },
                    "required": ["id", "relevance", "reason"]
                }
            }
        },
        "required": ["results"]
    })
}

/// Builds the search request for `query` over `prompts`
pub fn search_request(prompts: &[PromptRecord], query: &str, limit: usize) -> Result<GenerationRequest> {
    let previews: Vec<PromptPreview<'_>> = prompts.iter().map(PromptPreview::from).collect();
    let library = serde_json::to_string(&previews)?;

    let prompt = format!(
        "You are a prompt search assistant. Find the prompts in the library below that best match \
the user's query.
Match on meaning, not just keywords, and consider the title, description, content preview, \
category and tags.

Prompt library:
{}

Return results with relevance greater than 0.5, at most {}, sorted from most to least relevant.
Each result has id (the prompt ID), relevance (a score between 0 and 1) and reason (a short \
explanation of why it matches).
User query: \"{}\"
",
        library, limit, query
    );

    Ok(GenerationRequest::new(prompt)
        .with_sampling(0.2, 0.8, 16)
        .with_max_output_tokens(1024)
        .with_response_schema(response_schema()))
}

/// Maps model hits back onto library prompts, best first
///
/// Hits naming an unknown ID are dropped.
pub fn rank_results(prompts: &[PromptRecord], text: &str, limit: usize) -> Result<Vec<RankedPrompt>> {
    let response: SearchResponse = serde_json::from_str(text.trim())?;

    let mut ranked: Vec<RankedPrompt> = response
        .results
        .into_iter()
        .filter_map(|hit| {
            let id = hit.id.round() as i64;
            let prompt = prompts.iter().find(|p| p.id == id);
            if prompt.is_none() {
                tracing::debug!("Dropping search hit for unknown prompt {}", id);
            }
            prompt.map(|p| RankedPrompt {
                prompt: p.clone(),
                relevance: hit.relevance,
                reason: hit.reason,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    ranked.truncate(limit);
    Ok(ranked)
}

/// Ranks library prompts against a natural-language query
///
/// # Errors
///
/// * `ConfigError::MissingApiKey` without a credential
/// * `PrommaError::EmptyLibrary` when there is nothing to search
/// * `PrommaError::Json` when the model's answer is not the expected structure
pub async fn ai_search<L>(
    llm: &L,
    prompts: &[PromptRecord],
    query: &str,
    limit: usize,
) -> Result<Vec<RankedPrompt>>
where
    L: LlmClient + ?Sized,
{
    if !llm.has_credential() {
        return Err(ConfigError::MissingApiKey.into());
    }
    if prompts.is_empty() {
        return Err(PrommaError::EmptyLibrary);
    }
    if query.trim().is_empty() {
        return Err(PrommaError::InvalidInput("query cannot be empty".to_string()));
    }

    let request = search_request(prompts, query.trim(), limit)?;
    let text = llm.generate(&request).await?;
    rank_results(prompts, &text, limit)
}
