//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{HistoryEntry, NewPrompt, PromptFilter, PromptRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Prompts and digest history are both keyed by auto-increment identifiers.
pub trait Storage {
    // ===== Prompts =====

    /// Creates a prompt and returns its ID
    ///
    /// Fails with `InvalidRecord` when the title or content is blank.
    fn create_prompt(&mut self, prompt: &NewPrompt) -> StorageResult<i64>;

    /// Gets a prompt by ID
    fn get_prompt(&self, id: i64) -> StorageResult<Option<PromptRecord>>;

    /// Lists prompts, most recently updated first
    fn list_prompts(&self, filter: &PromptFilter) -> StorageResult<Vec<PromptRecord>>;

    /// Replaces a prompt's fields; returns false if the ID does not exist
    fn update_prompt(&mut self, id: i64, prompt: &NewPrompt) -> StorageResult<bool>;

    /// Deletes a prompt; returns false if the ID does not exist
    fn delete_prompt(&mut self, id: i64) -> StorageResult<bool>;

    /// Case-insensitive substring search over all text fields
    fn search_prompts(&self, keyword: &str) -> StorageResult<Vec<PromptRecord>>;

    /// Deletes every prompt and returns how many were removed
    fn clear_prompts(&mut self) -> StorageResult<usize>;

    /// Distinct categories in first-seen order
    fn list_categories(&self) -> StorageResult<Vec<String>>;

    /// Distinct individual tags, sorted
    fn list_tags(&self) -> StorageResult<Vec<String>>;

    // ===== Digest history =====

    /// Records a completed digest and returns the new entry's ID
    fn record_history(
        &mut self,
        url: &str,
        instruction: Option<&str>,
        summary: &str,
    ) -> StorageResult<i64>;

    /// Lists history entries, newest first
    fn list_history(&self) -> StorageResult<Vec<HistoryEntry>>;

    /// Gets a history entry by ID
    fn get_history(&self, id: i64) -> StorageResult<Option<HistoryEntry>>;

    /// Deletes a history entry; returns false if the ID does not exist
    fn delete_history(&mut self, id: i64) -> StorageResult<bool>;

    /// Deletes every history entry and returns how many were removed
    fn clear_history(&mut self) -> StorageResult<usize>;
}
