//! Prompt library commands

use super::Context;
use anyhow::{bail, Context as _};
use promma::library::{export_prompt, import_prompts, ExportFormat};
use promma::output::{format_prompt_detail, format_prompt_table};
use promma::storage::{NewPrompt, PromptFilter, Storage};
use promma::ui::{copy_to_clipboard, Terminal};
use promma::PrommaError;
use std::path::Path;

pub fn list(ctx: &Context, category: Option<String>, tag: Option<String>) -> anyhow::Result<()> {
    let storage = ctx.open_storage()?;
    let prompts = storage.list_prompts(&PromptFilter { category, tag })?;

    if prompts.is_empty() {
        println!("No prompts found.");
    } else {
        println!("{}", format_prompt_table(&prompts));
        println!("{} prompt(s)", prompts.len());
    }
    Ok(())
}

/// Shows a prompt, then offers to copy or delete it
pub fn view(ctx: &Context, id: i64) -> anyhow::Result<()> {
    let mut storage = ctx.open_storage()?;
    let prompt = storage
        .get_prompt(id)?
        .ok_or(PrommaError::PromptNotFound(id))?;

    let mut terminal = Terminal::stdio();
    terminal.say(&format_prompt_detail(&prompt))?;

    loop {
        let answer = terminal.ask("[c] copy  [d] delete  [q] quit: ")?;
        match answer.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("c") => {
                match copy_to_clipboard(&prompt.content) {
                    Ok(()) => terminal.say("Prompt content copied to clipboard.")?,
                    Err(e) => terminal.say(&format!("Could not copy to clipboard: {}", e))?,
                }
                return Ok(());
            }
            Some("d") => {
                if terminal.confirm(&format!("Delete prompt '{}'?", prompt.title), false)? {
                    storage.delete_prompt(id)?;
                    terminal.say("Prompt deleted.")?;
                }
                return Ok(());
            }
            None | Some("") | Some("q") => return Ok(()),
            Some(other) => terminal.say(&format!("Unknown choice '{}'.", other))?,
        }
    }
}

/// Creates a prompt; blank required fields are asked for interactively
pub fn create(ctx: &Context, mut prompt: NewPrompt) -> anyhow::Result<()> {
    let interactive = prompt.title.trim().is_empty() || prompt.content.trim().is_empty();

    if interactive {
        let mut terminal = Terminal::stdio();
        if prompt.title.trim().is_empty() {
            match terminal.ask_required("Title")? {
                Some(title) => prompt.title = title,
                None => bail!("prompt creation cancelled"),
            }
        }
        if prompt.description.is_none() {
            prompt.description = terminal.ask("Description (optional): ")?;
        }
        if prompt.content.trim().is_empty() {
            match terminal.ask_required("Content")? {
                Some(content) => prompt.content = content,
                None => bail!("prompt creation cancelled"),
            }
        }
        if prompt.category.is_none() {
            prompt.category = Some(terminal.ask_with_default(
                "Category",
                promma::storage::DEFAULT_CATEGORY,
            )?);
        }
        if prompt.tags.is_none() {
            prompt.tags = terminal.ask("Tags, comma separated (optional): ")?;
        }
    }

    let mut storage = ctx.open_storage()?;
    let id = storage.create_prompt(&prompt)?;
    println!("Prompt saved with id {}.", id);
    Ok(())
}

pub fn delete(ctx: &Context, id: i64, yes: bool) -> anyhow::Result<()> {
    let mut storage = ctx.open_storage()?;
    let prompt = storage
        .get_prompt(id)?
        .ok_or(PrommaError::PromptNotFound(id))?;

    if !yes {
        let mut terminal = Terminal::stdio();
        if !terminal.confirm(&format!("Delete prompt '{}'?", prompt.title), false)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    storage.delete_prompt(id)?;
    println!("Prompt {} deleted.", id);
    Ok(())
}

pub fn search(ctx: &Context, keyword: &str) -> anyhow::Result<()> {
    let storage = ctx.open_storage()?;
    let prompts = storage.search_prompts(keyword)?;

    if prompts.is_empty() {
        println!("No prompts match '{}'.", keyword);
    } else {
        println!("{}", format_prompt_table(&prompts));
    }
    Ok(())
}

pub fn categories(ctx: &Context) -> anyhow::Result<()> {
    let storage = ctx.open_storage()?;
    print_names(&storage.list_categories()?, "No categories yet.");
    Ok(())
}

pub fn tags(ctx: &Context) -> anyhow::Result<()> {
    let storage = ctx.open_storage()?;
    print_names(&storage.list_tags()?, "No tags yet.");
    Ok(())
}

fn print_names(names: &[String], empty: &str) {
    if names.is_empty() {
        println!("{}", empty);
    }
    for name in names {
        println!("{}", name);
    }
}

pub fn export(ctx: &Context, id: i64, format: &str) -> anyhow::Result<()> {
    let format: ExportFormat = format.parse()?;
    let storage = ctx.open_storage()?;
    let prompt = storage
        .get_prompt(id)?
        .ok_or(PrommaError::PromptNotFound(id))?;

    println!("{}", export_prompt(&prompt, format)?);
    Ok(())
}

pub fn clear_all(ctx: &Context, yes: bool) -> anyhow::Result<()> {
    if !yes {
        let mut terminal = Terminal::stdio();
        if !terminal.confirm("Delete every prompt in the library?", false)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let mut storage = ctx.open_storage()?;
    let removed = storage.clear_prompts()?;
    println!("Deleted {} prompt(s).", removed);
    Ok(())
}

pub fn import(ctx: &Context, file: &Path) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let mut storage = ctx.open_storage()?;
    let report = import_prompts(&mut storage, &json)?;
    println!(
        "Imported {} prompt(s), skipped {}.",
        report.imported, report.skipped
    );
    Ok(())
}
