//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageResult};
use crate::storage::{split_tags, HistoryEntry, NewPrompt, PromptFilter, PromptRecord};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const PROMPT_COLUMNS: &str =
    "id, title, description, content, category, tags, created_at, updated_at";

const HISTORY_COLUMNS: &str = "id, url, instruction, summary, created_at";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database file at `path`
    ///
    /// Parent directories are created when missing.
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        tracing::debug!("Opened database {}", path.display());
        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn query_prompts(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> StorageResult<Vec<PromptRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let prompts = stmt
            .query_map(params, prompt_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(prompts)
    }
}

fn prompt_from_row(row: &Row<'_>) -> rusqlite::Result<PromptRecord> {
    Ok(PromptRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        content: row.get(3)?,
        category: row.get(4)?,
        tags: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn history_from_row(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        url: row.get(1)?,
        instruction: row.get(2)?,
        summary: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Escapes LIKE wildcards so user keywords match literally
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl Storage for SqliteStorage {
    // ===== Prompts =====

    fn create_prompt(&mut self, prompt: &NewPrompt) -> StorageResult<i64> {
        prompt.validate()?;
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO prompts (title, description, content, category, tags, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                prompt.title.trim(),
                prompt.description_value(),
                prompt.content,
                prompt.category_value(),
                prompt.tags_value(),
                now
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!("Created prompt {}", id);
        Ok(id)
    }

    fn get_prompt(&self, id: i64) -> StorageResult<Option<PromptRecord>> {
        let prompt = self
            .conn
            .query_row(
                &format!("SELECT {PROMPT_COLUMNS} FROM prompts WHERE id = ?1"),
                params![id],
                prompt_from_row,
            )
            .optional()?;
        Ok(prompt)
    }

    fn list_prompts(&self, filter: &PromptFilter) -> StorageResult<Vec<PromptRecord>> {
        let prompts = match &filter.category {
            Some(category) => self.query_prompts(
                &format!(
                    "SELECT {PROMPT_COLUMNS} FROM prompts WHERE category = ?1
                     ORDER BY updated_at DESC, id DESC"
                ),
                params![category],
            )?,
            None => self.query_prompts(
                &format!("SELECT {PROMPT_COLUMNS} FROM prompts ORDER BY updated_at DESC, id DESC"),
                [],
            )?,
        };

        Ok(prompts
            .into_iter()
            .filter(|p| filter.matches_tag(p))
            .collect())
    }

    fn update_prompt(&mut self, id: i64, prompt: &NewPrompt) -> StorageResult<bool> {
        prompt.validate()?;
        let now = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE prompts SET title = ?1, description = ?2, content = ?3, category = ?4,
             tags = ?5, updated_at = ?6 WHERE id = ?7",
            params![
                prompt.title.trim(),
                prompt.description_value(),
                prompt.content,
                prompt.category_value(),
                prompt.tags_value(),
                now,
                id
            ],
        )?;
        Ok(changed > 0)
    }

    fn delete_prompt(&mut self, id: i64) -> StorageResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM prompts WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn search_prompts(&self, keyword: &str) -> StorageResult<Vec<PromptRecord>> {
        self.query_prompts(
            &format!(
                "SELECT {PROMPT_COLUMNS} FROM prompts
                 WHERE title LIKE ?1 ESCAPE '\\'
                    OR IFNULL(description, '') LIKE ?1 ESCAPE '\\'
                    OR content LIKE ?1 ESCAPE '\\'
                    OR category LIKE ?1 ESCAPE '\\'
                    OR IFNULL(tags, '') LIKE ?1 ESCAPE '\\'
                 ORDER BY updated_at DESC, id DESC"
            ),
            params![like_pattern(keyword.trim())],
        )
    }

    fn clear_prompts(&mut self) -> StorageResult<usize> {
        let removed = self.conn.execute("DELETE FROM prompts", [])?;
        tracing::info!("Cleared {} prompts", removed);
        Ok(removed)
    }

    fn list_categories(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT category FROM prompts GROUP BY category ORDER BY MIN(id)")?;
        let categories = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(categories)
    }

    fn list_tags(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tags FROM prompts WHERE tags IS NOT NULL")?;
        let raw = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut tags: Vec<String> = raw.iter().flat_map(|t| split_tags(t)).collect();
        tags.sort();
        tags.dedup();
        Ok(tags)
    }

    // ===== Digest history =====

    fn record_history(
        &mut self,
        url: &str,
        instruction: Option<&str>,
        summary: &str,
    ) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO history (url, instruction, summary, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![url, instruction, summary, now],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!("Recorded history entry {} for {}", id, url);
        Ok(id)
    }

    fn list_history(&self) -> StorageResult<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {HISTORY_COLUMNS} FROM history ORDER BY created_at DESC, id DESC"
        ))?;
        let entries = stmt
            .query_map([], history_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn get_history(&self, id: i64) -> StorageResult<Option<HistoryEntry>> {
        let entry = self
            .conn
            .query_row(
                &format!("SELECT {HISTORY_COLUMNS} FROM history WHERE id = ?1"),
                params![id],
                history_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    fn delete_history(&mut self, id: i64) -> StorageResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM history WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn clear_history(&mut self) -> StorageResult<usize> {
        let removed = self.conn.execute("DELETE FROM history", [])?;
        tracing::info!("Cleared {} history entries", removed);
        Ok(removed)
    }
}
