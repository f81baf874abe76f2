//! LLM-backed library commands

use super::Context;
use anyhow::bail;
use promma::config::save_api_key;
use promma::library::{ai_search, generate_prompt, GeneratedPrompt};
use promma::llm::GeminiClient;
use promma::output::{format_generated, format_ranked};
use promma::storage::{PromptFilter, Storage};
use promma::ui::Terminal;

/// Generates a prompt from a description and offers to save it
pub async fn generate(ctx: &Context, input: Option<String>) -> anyhow::Result<()> {
    let mut terminal = Terminal::stdio();

    let mut llm_config = ctx.config.llm.clone();
    if ctx.config.api_key().is_none() {
        terminal.say("No Gemini API key is configured.")?;
        let Some(key) = terminal
            .ask("Enter an API key to save it (blank to cancel): ")?
            .filter(|k| !k.is_empty())
        else {
            bail!("a Gemini API key is required to generate prompts");
        };
        save_api_key(&ctx.config_file(), &key)?;
        terminal.say("API key saved.")?;
        llm_config.api_key = Some(key);
    }

    let input = match input.filter(|i| !i.trim().is_empty()) {
        Some(input) => input,
        None => match terminal.ask_required("Describe the prompt you need")? {
            Some(input) => input,
            None => bail!("nothing to generate"),
        },
    };

    terminal.say("Generating prompt...")?;
    let llm = GeminiClient::new(&llm_config)?;
    let generated = generate_prompt(&llm, &input).await?;
    terminal.say(&format_generated(&generated))?;

    let GeneratedPrompt::Structured(structured) = generated else {
        terminal.say("The response was not a structured prompt, so it was not saved.")?;
        return Ok(());
    };

    if !terminal.confirm("Save this prompt to the library?", true)? {
        return Ok(());
    }
    let category = terminal.ask_with_default("Category", promma::storage::DEFAULT_CATEGORY)?;

    let mut storage = ctx.open_storage()?;
    let id = storage.create_prompt(&structured.into_new_prompt(Some(category)))?;
    terminal.say(&format!("Prompt saved with id {}.", id))?;
    Ok(())
}

/// Ranks library prompts against a natural-language query
pub async fn search(ctx: &Context, query: &str, limit: usize) -> anyhow::Result<()> {
    let storage = ctx.open_storage()?;
    let prompts = storage.list_prompts(&PromptFilter::default())?;

    let llm = ctx.llm()?;
    let results = ai_search(&llm, &prompts, query, limit).await?;

    if results.is_empty() {
        println!("No relevant prompts found.");
    } else {
        println!("{}", format_ranked(&results));
    }
    Ok(())
}
