//! Digest history commands

use super::Context;
use promma::output::{format_history_entry, format_history_table};
use promma::storage::Storage;
use promma::ui::{copy_to_clipboard, Terminal};
use promma::PrommaError;

pub fn list(ctx: &Context) -> anyhow::Result<()> {
    let storage = ctx.open_storage()?;
    let entries = storage.list_history()?;

    if entries.is_empty() {
        println!("No digest history yet.");
    } else {
        println!("{}", format_history_table(&entries));
    }
    Ok(())
}

/// Shows an entry, then offers to copy its summary or delete it
pub fn show(ctx: &Context, id: i64) -> anyhow::Result<()> {
    let mut storage = ctx.open_storage()?;
    let entry = storage
        .get_history(id)?
        .ok_or(PrommaError::HistoryNotFound(id))?;

    let mut terminal = Terminal::stdio();
    terminal.say(&format_history_entry(&entry))?;

    loop {
        let answer = terminal.ask("[c] copy summary  [d] delete  [q] quit: ")?;
        match answer.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("c") => {
                match copy_to_clipboard(&entry.summary) {
                    Ok(()) => terminal.say("Summary copied to clipboard.")?,
                    Err(e) => terminal.say(&format!("Could not copy to clipboard: {}", e))?,
                }
                return Ok(());
            }
            Some("d") => {
                if terminal.confirm("Delete this history entry?", false)? {
                    storage.delete_history(id)?;
                    terminal.say("History entry deleted.")?;
                }
                return Ok(());
            }
            None | Some("") | Some("q") => return Ok(()),
            Some(other) => terminal.say(&format!("Unknown choice '{}'.", other))?,
        }
    }
}

pub fn delete(ctx: &Context, id: i64) -> anyhow::Result<()> {
    let mut storage = ctx.open_storage()?;
    if !storage.delete_history(id)? {
        return Err(PrommaError::HistoryNotFound(id).into());
    }
    println!("History entry {} deleted.", id);
    Ok(())
}

pub fn clear(ctx: &Context, yes: bool) -> anyhow::Result<()> {
    if !yes {
        let mut terminal = Terminal::stdio();
        if !terminal.confirm("Delete all digest history?", false)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let mut storage = ctx.open_storage()?;
    let removed = storage.clear_history()?;
    println!("Deleted {} history entr{}.", removed, if removed == 1 { "y" } else { "ies" });
    Ok(())
}
