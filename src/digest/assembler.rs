//! Digest assembly: crawl, cap, summarize, record

use crate::config::DigestConfig;
use crate::crawler::{crawl, ContentSection, CrawlOptions, ExtractOptions, PageFetcher};
use crate::llm::{GenerationRequest, LlmClient};
use crate::storage::Storage;
use crate::url::parse_seed_url;
use crate::{ConfigError, PrommaError, Result};

/// Appended when content is cut at the size cap
pub const TRUNCATION_MARKER: &str = "... (content truncated)";

/// Parameters of one digest invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestRequest {
    /// Seed URL as supplied by the user
    pub url: String,

    /// Prepended verbatim to the summarization prompt
    pub instruction: Option<String>,

    /// Maximum hops from the seed
    pub max_depth: u32,

    /// Seed page only, with the smaller content cap
    pub single_page: bool,
}

impl DigestRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            instruction: None,
            max_depth: 0,
            single_page: false,
        }
    }

    pub fn with_instruction(mut self, instruction: Option<String>) -> Self {
        self.instruction = instruction.filter(|i| !i.trim().is_empty());
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn single_page(mut self, single_page: bool) -> Self {
        self.single_page = single_page;
        self
    }

    fn crawl_options(&self) -> CrawlOptions {
        if self.single_page {
            CrawlOptions {
                max_depth: 0,
                extract: ExtractOptions {
                    include_containers: false,
                },
            }
        } else {
            CrawlOptions {
                max_depth: self.max_depth,
                extract: ExtractOptions {
                    include_containers: true,
                },
            }
        }
    }
}

/// Result of a successful digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestOutcome {
    /// Markdown summary of the whole crawl
    pub summary: String,

    /// The seed URL
    pub url: String,

    /// Deduplicated same-domain links found anywhere in the crawl
    pub found_links: Vec<String>,

    /// ID of the history entry written for this digest
    pub history_id: i64,
}

/// Joins per-page sections, each headed by its source URL
pub fn join_sections(sections: &[ContentSection]) -> String {
    sections
        .iter()
        .map(|s| format!("--- Source: {} ---\n{}", s.url, s.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Cuts `content` to `cap` characters and appends the truncation marker
///
/// Content within the cap is returned unchanged.
pub fn cap_content(content: String, cap: usize) -> String {
    match content.char_indices().nth(cap) {
        Some((byte_index, _)) => {
            let mut truncated = content[..byte_index].to_string();
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => content,
    }
}

/// Builds the summarization prompt
pub fn build_summary_prompt(
    seed_url: &str,
    other_urls: &[&str],
    content: &str,
    instruction: Option<&str>,
) -> String {
    let mut sources = format!("The web content comes from: {}", seed_url);
    if !other_urls.is_empty() {
        sources.push_str("\nAdditional pages included:");
        for url in other_urls {
            sources.push_str("\n- ");
            sources.push_str(url);
        }
    }

    let base = format!(
        "Summarize the following web content as a concise Markdown digest. \
The summary should have a title and a bullet list of key points, and highlight the most important information.\n\
{}\n\n---\n{}\n---\n\n\
Output only the Markdown summary, without any preamble or extra explanation.",
        sources, content
    );

    match instruction {
        Some(instruction) if !instruction.trim().is_empty() => {
            format!("{}\n\n{}", instruction, base)
        }
        _ => base,
    }
}

/// Runs digests against a fetcher, a generation backend and a history store
pub struct DigestService<F, L, S> {
    fetcher: F,
    llm: L,
    storage: S,
    config: DigestConfig,
}

impl<F, L, S> DigestService<F, L, S>
where
    F: PageFetcher,
    L: LlmClient,
    S: Storage,
{
    pub fn new(fetcher: F, llm: L, storage: S, config: DigestConfig) -> Self {
        Self {
            fetcher,
            llm,
            storage,
            config,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Crawls, summarizes and records one digest
    ///
    /// # Errors
    ///
    /// * `ConfigError::MissingApiKey` before any fetch when no credential is configured
    /// * `UrlError` for a seed that is not an http(s) URL
    /// * `PrommaError::EmptyContent` when no page yielded text
    /// * `PrommaError::Llm` when the summarization call fails
    ///
    /// History is written only when all of the above succeed.
    pub async fn digest(
        &mut self,
        request: &DigestRequest,
        progress: &mut dyn FnMut(&str),
    ) -> Result<DigestOutcome> {
        if !self.llm.has_credential() {
            return Err(ConfigError::MissingApiKey.into());
        }

        let seed_url = request.url.trim().to_string();
        let seed = parse_seed_url(&seed_url)?;
        let options = request.crawl_options();

        tracing::info!(
            "Digesting {} (depth {}{})",
            seed_url,
            options.max_depth,
            if request.single_page { ", single page" } else { "" }
        );

        let output = crawl(&self.fetcher, &seed, options, progress).await;
        if output.is_empty() {
            return Err(PrommaError::EmptyContent { url: seed_url });
        }

        let cap = if request.single_page {
            self.config.single_page_max_content_chars
        } else {
            self.config.max_content_chars
        };
        let joined = join_sections(&output.sections);
        let joined_len = joined.chars().count();
        let content = cap_content(joined, cap);
        if joined_len > cap {
            tracing::debug!("Content truncated from {} to {} characters", joined_len, cap);
        }

        let other_urls: Vec<&str> = output
            .sections
            .iter()
            .map(|s| s.url.as_str())
            .filter(|u| *u != seed.url.as_str())
            .collect();
        let prompt = build_summary_prompt(
            &seed_url,
            &other_urls,
            &content,
            request.instruction.as_deref(),
        );

        progress("Summarizing content...");
        let summary = self.llm.generate(&GenerationRequest::new(prompt)).await?;

        let history_id =
            self.storage
                .record_history(&seed_url, request.instruction.as_deref(), &summary)?;

        tracing::info!(
            "Digest of {} complete: {} pages, {} links, history entry {}",
            seed_url,
            output.sections.len(),
            output.links.len(),
            history_id
        );

        Ok(DigestOutcome {
            summary,
            url: seed_url,
            found_links: output.links,
            history_id,
        })
    }
}
