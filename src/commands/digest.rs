//! `promma digest`: summarize a page, then browse its links

use super::Context;
use promma::crawler::HttpFetcher;
use promma::digest::{run_session, DigestRequest, SessionUi};
use promma::ui::Terminal;
use promma::{DigestService, DigestedPage, NavigationState};

pub async fn run(
    ctx: &Context,
    url: String,
    instruction: Option<String>,
    depth: u32,
    single_page: bool,
) -> anyhow::Result<()> {
    let request = DigestRequest::new(url)
        .with_instruction(instruction)
        .with_max_depth(depth)
        .single_page(single_page);

    let fetcher = HttpFetcher::new(&ctx.config.digest)?;
    let mut service = DigestService::new(
        fetcher,
        ctx.llm()?,
        ctx.open_storage()?,
        ctx.config.digest.clone(),
    );
    let mut terminal = Terminal::stdio();

    let outcome = service
        .digest(&request, &mut |message: &str| terminal.progress(message))
        .await?;
    tracing::debug!("Recorded history entry {}", outcome.history_id);

    let page = DigestedPage::from_outcome(outcome, &request);
    let state = run_session(NavigationState::new(page), &mut service, &mut terminal).await?;
    tracing::debug!("Session ended with {} page(s) on the stack", state.len());
    Ok(())
}
