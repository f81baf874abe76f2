//! Prompt export and bulk import

use crate::storage::{NewPrompt, PromptRecord, Storage};
use crate::{PrommaError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Output format for `export_prompt`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Content only
    #[default]
    Text,
    Markdown,
    Json,
}

impl FromStr for ExportFormat {
    type Err = PrommaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "md" | "markdown" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(PrommaError::InvalidInput(format!(
                "unsupported export format '{}' (expected text, md or json)",
                other
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Markdown => "md",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

/// Renders a prompt in the requested format
pub fn export_prompt(prompt: &PromptRecord, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Text => Ok(prompt.content.clone()),
        ExportFormat::Markdown => {
            let mut out = format!("# {}", prompt.title);
            if let Some(description) = prompt.description.as_deref() {
                out.push_str(&format!("\n\n> {}", description));
            }
            out.push_str(&format!("\n\n{}\n\n> Category: {}", prompt.content, prompt.category));
            if let Some(tags) = prompt.tags.as_deref() {
                out.push_str(&format!("\n> Tags: {}", tags));
            }
            Ok(out)
        }
        ExportFormat::Json => Ok(serde_json::to_string_pretty(prompt)?),
    }
}

/// Outcome of `import_prompts`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// Imports prompts from a JSON array
///
/// Entries that are not objects, lack a title or content, or fail to
/// insert are skipped and counted. A document that is not an array is an
/// error and nothing is imported.
pub fn import_prompts<S>(storage: &mut S, json: &str) -> Result<ImportReport>
where
    S: Storage + ?Sized,
{
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(entries) = value else {
        return Err(PrommaError::InvalidInput(
            "import file must contain a JSON array of prompts".to_string(),
        ));
    };

    let mut report = ImportReport::default();

    for (index, entry) in entries.into_iter().enumerate() {
        let prompt: NewPrompt = match serde_json::from_value(entry) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!("Skipping entry {}: {}", index, e);
                report.skipped += 1;
                continue;
            }
        };

        if prompt.title.trim().is_empty() || prompt.content.trim().is_empty() {
            tracing::warn!("Skipping entry {}: missing title or content", index);
            report.skipped += 1;
            continue;
        }

        match storage.create_prompt(&prompt) {
            Ok(id) => {
                tracing::debug!("Imported entry {} as prompt {}", index, id);
                report.imported += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to import '{}': {}", prompt.title, e);
                report.skipped += 1;
            }
        }
    }

    tracing::info!(
        "Imported {} prompts, skipped {}",
        report.imported,
        report.skipped
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{PromptFilter, SqliteStorage};

    fn record() -> PromptRecord {
        PromptRecord {
            id: 4,
            title: "Reviewer".to_string(),
            description: Some("Reviews code".to_string()),
            content: "Review this diff.".to_string(),
            category: "dev".to_string(),
            tags: Some("review, code".to_string()),
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            updated_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("MD".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_text() {
        assert_eq!(
            export_prompt(&record(), ExportFormat::Text).unwrap(),
            "Review this diff."
        );
    }

    #[test]
    fn test_export_markdown() {
        assert_eq!(
            export_prompt(&record(), ExportFormat::Markdown).unwrap(),
            "# Reviewer\n\n> Reviews code\n\nReview this diff.\n\n> Category: dev\n> Tags: review, code"
        );

        let bare = PromptRecord {
            description: None,
            tags: None,
            ..record()
        };
        assert_eq!(
            export_prompt(&bare, ExportFormat::Markdown).unwrap(),
            "# Reviewer\n\nReview this diff.\n\n> Category: dev"
        );
    }

    #[test]
    fn test_export_json() {
        let json = export_prompt(&record(), ExportFormat::Json).unwrap();
        let back: PromptRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record());
    }

    #[test]
    fn test_import_skips_invalid_entries() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let json = r#"[
            {"title": "One", "content": "first", "tags": "a"},
            {"title": "", "content": "no title"},
            {"content": "missing title"},
            "not an object",
            {"title": "Two", "content": "second", "category": "misc"}
        ]"#;

        let report = import_prompts(&mut storage, json).unwrap();
        assert_eq!(report, ImportReport { imported: 2, skipped: 3 });

        let prompts = storage.list_prompts(&PromptFilter::default()).unwrap();
        assert_eq!(prompts.len(), 2);
    }

    #[test]
    fn test_import_requires_array() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        assert!(matches!(
            import_prompts(&mut storage, r#"{"title": "x"}"#),
            Err(PrommaError::InvalidInput(_))
        ));
        assert!(matches!(
            import_prompts(&mut storage, "not json"),
            Err(PrommaError::Json(_))
        ));
    }

    #[test]
    fn test_import_round_trip_of_export() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let exported = export_prompt(&record(), ExportFormat::Json).unwrap();
        let report = import_prompts(&mut storage, &format!("[{}]", exported)).unwrap();
        assert_eq!(report.imported, 1);
    }
}
