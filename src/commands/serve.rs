//! `promma serve`

use super::Context;
use anyhow::Context as _;
use promma::server::{serve, AppState};
use std::net::SocketAddr;
use std::sync::Arc;

pub async fn run(ctx: &Context, bind: Option<String>) -> anyhow::Result<()> {
    let bind = bind.unwrap_or_else(|| ctx.config.server.bind.clone());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", bind))?;

    let llm = ctx.llm()?;
    if ctx.config.api_key().is_none() {
        tracing::warn!("No Gemini API key configured; /api/prompts/generate will fail");
    }

    let state = AppState::new(ctx.open_storage()?, Arc::new(llm));
    serve(addr, state).await?;
    Ok(())
}
