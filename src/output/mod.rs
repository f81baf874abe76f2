//! Output module for rendering library data in the terminal
//!
//! This module handles:
//! - Boxed panels for prompts, digests and help
//! - Tables for prompt and history listings
//!
//! Everything here returns strings; printing is left to the caller.

mod panel;
mod table;

pub use panel::render_panel;
pub use table::{render_table, truncate_display};

use crate::digest::{Command, DigestedPage};
use crate::library::{GeneratedPrompt, RankedPrompt};
use crate::storage::{HistoryEntry, PromptRecord};

/// Longest link shown in a link menu before it is shortened
pub const LINK_DISPLAY_CHARS: usize = 80;

/// Table of prompts for `list` and `search`
pub fn format_prompt_table(prompts: &[PromptRecord]) -> String {
    let rows: Vec<Vec<String>> = prompts
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                truncate_display(&p.title, 30),
                truncate_display(p.description.as_deref().unwrap_or(""), 40),
                p.category.clone(),
                truncate_display(p.tags.as_deref().unwrap_or(""), 30),
            ]
        })
        .collect();

    render_table(&["ID", "Title", "Description", "Category", "Tags"], &rows)
}

/// Full view of one prompt
pub fn format_prompt_detail(prompt: &PromptRecord) -> String {
    let mut body = String::new();
    if let Some(description) = prompt.description.as_deref() {
        body.push_str(description);
        body.push_str("\n\n");
    }
    body.push_str(&prompt.content);
    body.push_str("\n\n");
    body.push_str(&format!("Category: {}\n", prompt.category));
    if let Some(tags) = prompt.tags.as_deref() {
        body.push_str(&format!("Tags:     {}\n", tags));
    }
    body.push_str(&format!("Created:  {}\n", prompt.created_at));
    body.push_str(&format!("Updated:  {}", prompt.updated_at));

    render_panel(&format!("#{} {}", prompt.id, prompt.title), &body)
}

/// A generated prompt awaiting confirmation
pub fn format_generated(generated: &GeneratedPrompt) -> String {
    match generated {
        GeneratedPrompt::Structured(p) => render_panel(
            &p.title,
            &format!(
                "{}\n\nContent:\n{}\n\nTags: {}",
                p.description,
                p.content,
                p.tags.join(", ")
            ),
        ),
        GeneratedPrompt::Raw(text) => render_panel("Generated prompt", text),
    }
}

/// AI search results, best first
pub fn format_ranked(results: &[RankedPrompt]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "{}. [{}] {} (relevance {:.0}%)\n   {}",
                i + 1,
                r.prompt.id,
                r.prompt.title,
                r.relevance * 100.0,
                r.reason
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Summary panel shown for each page of a digest session
pub fn format_digest_page(page: &DigestedPage, position: usize) -> String {
    let mut body = page.summary.trim_end().to_string();
    body.push_str(&format!("\n\nSource: {}", page.url));
    if !page.found_links.is_empty() {
        body.push_str(&format!("\nLinks found: {}", page.found_links.len()));
    }
    let title = if position > 1 {
        format!("AI Summary (level {})", position)
    } else {
        "AI Summary".to_string()
    };
    render_panel(&title, &body)
}

/// Session help panel
pub fn format_session_help(commands: &[Command]) -> String {
    let body = commands
        .iter()
        .map(|c| format!("  {}: {}", c.key(), c.description()))
        .collect::<Vec<_>>()
        .join("\n");
    render_panel(
        "Help",
        &format!(
            "{}\n\nDrill into links or go back up to move through the pages you have digested.",
            body
        ),
    )
}

/// Numbered link menu; long links are shortened
pub fn format_link_menu(links: &[String]) -> String {
    links
        .iter()
        .enumerate()
        .map(|(i, link)| format!("{:>3}. {}", i + 1, truncate_display(link, LINK_DISPLAY_CHARS)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Table of digest history entries
pub fn format_history_table(entries: &[HistoryEntry]) -> String {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                truncate_display(&e.url, 50),
                truncate_display(e.instruction.as_deref().unwrap_or(""), 30),
                e.created_at.clone(),
            ]
        })
        .collect();

    render_table(&["ID", "URL", "Instruction", "Created"], &rows)
}

/// Full view of one history entry
pub fn format_history_entry(entry: &HistoryEntry) -> String {
    let mut body = entry.summary.trim_end().to_string();
    body.push_str(&format!("\n\nSource:  {}", entry.url));
    if let Some(instruction) = entry.instruction.as_deref() {
        body.push_str(&format!("\nInstruction: {}", instruction));
    }
    body.push_str(&format!("\nCreated: {}", entry.created_at));
    render_panel(&format!("History #{}", entry.id), &body)
}
