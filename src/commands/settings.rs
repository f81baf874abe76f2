//! `promma config`

use super::Context;
use anyhow::Context as _;
use promma::config::save_api_key;

const KEY_PREFIX_CHARS: usize = 5;

pub fn run(ctx: &Context, show: bool, api_key: Option<String>) -> anyhow::Result<()> {
    if let Some(key) = api_key {
        let path = ctx.config_file();
        save_api_key(&path, &key)
            .with_context(|| format!("failed to save the API key to {}", path.display()))?;
        println!("API key saved to {}.", path.display());
        return Ok(());
    }

    if show {
        let key = match ctx.config.api_key() {
            Some(key) => format!("{}...", key.chars().take(KEY_PREFIX_CHARS).collect::<String>()),
            None => "(not set)".to_string(),
        };
        println!("Config file:  {}", ctx.config_file().display());
        println!("Database:     {}", ctx.database_path().display());
        println!("API key:      {}", key);
        println!("Model:        {}", ctx.config.llm.model);
        println!("Server bind:  {}", ctx.config.server.bind);
        return Ok(());
    }

    println!("Use --show to print the configuration or --api-key KEY to store a key.");
    Ok(())
}
