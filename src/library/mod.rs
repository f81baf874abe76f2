//! Prompt library services built on storage and the generation backend
//!
//! - `generate`: structured prompt generation
//! - `search`: semantic search ranked by the model
//! - `transfer`: export to text/Markdown/JSON and JSON import

mod generate;
mod search;
mod transfer;

pub use generate::{
    generate_prompt, generation_request, parse_generated, GeneratedPrompt, StructuredPrompt,
};
pub use search::{
    ai_search, rank_results, search_request, RankedPrompt, DEFAULT_SEARCH_LIMIT, PREVIEW_CHARS,
};
pub use transfer::{export_prompt, import_prompts, ExportFormat, ImportReport};
