//! Storage module for persisting the prompt library and digest history
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Prompt CRUD, filtering and keyword search
//! - Digest history records

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Category assigned to prompts created without one
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Initializes or opens a storage database
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// Represents a prompt in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub category: String,
    /// Comma-separated tag list as entered
    pub tags: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl PromptRecord {
    /// Individual tags, trimmed, empty entries dropped
    pub fn tag_list(&self) -> Vec<String> {
        self.tags.as_deref().map(split_tags).unwrap_or_default()
    }
}

/// Fields for creating or replacing a prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPrompt {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub tags: Option<String>,
}

impl NewPrompt {
    /// Checks the required fields
    pub fn validate(&self) -> StorageResult<()> {
        if self.title.trim().is_empty() {
            return Err(StorageError::InvalidRecord(
                "prompt title cannot be empty".to_string(),
            ));
        }
        if self.content.trim().is_empty() {
            return Err(StorageError::InvalidRecord(
                "prompt content cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn description_value(&self) -> Option<&str> {
        non_blank(self.description.as_deref())
    }

    pub(crate) fn category_value(&self) -> &str {
        non_blank(self.category.as_deref()).unwrap_or(DEFAULT_CATEGORY)
    }

    pub(crate) fn tags_value(&self) -> Option<&str> {
        non_blank(self.tags.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Filters applied by `Storage::list_prompts`
#[derive(Debug, Clone, Default)]
pub struct PromptFilter {
    /// Exact category match
    pub category: Option<String>,

    /// Case-insensitive match against any individual tag
    pub tag: Option<String>,
}

impl PromptFilter {
    pub(crate) fn matches_tag(&self, prompt: &PromptRecord) -> bool {
        match &self.tag {
            None => true,
            Some(tag) => {
                let tag = tag.trim();
                prompt.tag_list().iter().any(|t| t.eq_ignore_ascii_case(tag))
            }
        }
    }
}

/// Represents a completed web digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub url: String,
    pub instruction: Option<String>,
    pub summary: String,
    pub created_at: String,
}

/// Splits a comma-separated tag string
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
