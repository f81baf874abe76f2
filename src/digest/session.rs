//! Interactive navigation over digested pages
//!
//! The session keeps every digested page on a stack. Drilling into a link
//! pushes a fresh depth-0 digest of that link; going up pops back to the
//! previous page. State changes happen only in [`transition`] and
//! [`complete_drill_down`], which are pure; [`run_session`] wires them to a
//! digester and a user interface.

use crate::crawler::PageFetcher;
use crate::digest::{DigestOutcome, DigestRequest, DigestService};
use crate::llm::LlmClient;
use crate::storage::Storage;
use crate::Result;
use async_trait::async_trait;
use std::io;

/// One digest as shown in the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestedPage {
    pub url: String,
    pub instruction: Option<String>,
    pub summary: String,
    pub found_links: Vec<String>,

    /// Depth the digest was run with
    pub depth: u32,
}

impl DigestedPage {
    pub fn from_outcome(outcome: DigestOutcome, request: &DigestRequest) -> Self {
        Self {
            url: outcome.url,
            instruction: request.instruction.clone(),
            summary: outcome.summary,
            found_links: outcome.found_links,
            depth: if request.single_page {
                0
            } else {
                request.max_depth
            },
        }
    }
}

/// Menu entries offered on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Copy,
    Quit,
    ListLinks,
    Up,
    Help,
}

impl Command {
    pub fn key(self) -> char {
        match self {
            Self::Copy => 'c',
            Self::Quit => 'q',
            Self::ListLinks => 'l',
            Self::Up => 'u',
            Self::Help => '?',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Copy => "Copy summary",
            Self::Quit => "Quit",
            Self::ListLinks => "List links and drill down",
            Self::Up => "Back to previous page",
            Self::Help => "Help",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Copy => "copy the current summary to the clipboard and exit",
            Self::Quit => "leave the digest session",
            Self::ListLinks => "list links found on this page and digest one of them",
            Self::Up => "return to the previously digested page",
            Self::Help => "show this help",
        }
    }

    /// Looks a command up by its key, ignoring case and surrounding whitespace
    pub fn from_key(input: &str) -> Option<Self> {
        let mut chars = input.trim().chars();
        let key = chars.next()?.to_ascii_lowercase();
        if chars.next().is_some() {
            return None;
        }
        [
            Self::Copy,
            Self::Quit,
            Self::ListLinks,
            Self::Up,
            Self::Help,
        ]
        .into_iter()
        .find(|c| c.key() == key)
    }
}

/// Navigation stack; never empty, the top is the page on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    stack: Vec<DigestedPage>,
}

impl NavigationState {
    pub fn new(first: DigestedPage) -> Self {
        Self { stack: vec![first] }
    }

    pub fn current(&self) -> &DigestedPage {
        // The stack always holds at least the first page
        &self.stack[self.stack.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn pages(&self) -> &[DigestedPage] {
        &self.stack
    }

    pub fn can_go_up(&self) -> bool {
        self.stack.len() > 1
    }

    /// Commands available for the current page, in menu order
    pub fn commands(&self) -> Vec<Command> {
        let mut commands = vec![Command::Copy, Command::Quit];
        if !self.current().found_links.is_empty() {
            commands.push(Command::ListLinks);
        }
        if self.can_go_up() {
            commands.push(Command::Up);
        }
        commands.push(Command::Help);
        commands
    }
}

/// A user decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Copy,
    Quit,
    /// Digest the given link, which must be among the current page's links
    DrillDown(String),
    Up,
    Help,
}

/// What the driver must do after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Copy the text, then end the session
    CopyAndExit(String),
    Exit,
    /// Run this digest and feed the result to `complete_drill_down`
    Digest(DigestRequest),
    /// Show the (new) current page
    Display,
    ShowHelp,
    /// The action was not valid in this state
    Rejected(String),
    /// A drill-down digest failed
    Failed(String),
}

/// Applies a user action to the navigation state
pub fn transition(mut state: NavigationState, action: Action) -> (NavigationState, Effect) {
    match action {
        Action::Copy => {
            let summary = state.current().summary.clone();
            (state, Effect::CopyAndExit(summary))
        }
        Action::Quit => (state, Effect::Exit),
        Action::DrillDown(url) => {
            let current = state.current();
            if !current.found_links.contains(&url) {
                return (
                    state,
                    Effect::Rejected(format!("{} is not a link of the current page", url)),
                );
            }
            let request = DigestRequest::new(url)
                .with_instruction(current.instruction.clone())
                .with_max_depth(0);
            (state, Effect::Digest(request))
        }
        Action::Up => {
            if state.can_go_up() {
                state.stack.pop();
                (state, Effect::Display)
            } else {
                (
                    state,
                    Effect::Rejected("Already at the top page".to_string()),
                )
            }
        }
        Action::Help => (state, Effect::ShowHelp),
    }
}

/// Applies the result of a drill-down digest
///
/// A failed digest leaves the stack untouched.
pub fn complete_drill_down(
    mut state: NavigationState,
    result: std::result::Result<DigestedPage, String>,
) -> (NavigationState, Effect) {
    match result {
        Ok(page) => {
            state.stack.push(page);
            (state, Effect::Display)
        }
        Err(message) => (state, Effect::Failed(message)),
    }
}

/// Produces digested pages for drill-downs
#[async_trait(?Send)]
pub trait PageDigester {
    async fn digest_page(
        &mut self,
        request: &DigestRequest,
        progress: &mut dyn for<'s> FnMut(&'s str),
    ) -> Result<DigestedPage>;
}

#[async_trait(?Send)]
impl<F, L, S> PageDigester for DigestService<F, L, S>
where
    F: PageFetcher,
    L: LlmClient,
    S: Storage,
{
    async fn digest_page(
        &mut self,
        request: &DigestRequest,
        progress: &mut dyn for<'s> FnMut(&'s str),
    ) -> Result<DigestedPage> {
        let outcome = self.digest(request, progress).await?;
        Ok(DigestedPage::from_outcome(outcome, request))
    }
}

/// Presentation side of a session
pub trait SessionUi {
    /// Shows a page; `level` is its 1-based position on the navigation stack
    fn show_page(&mut self, page: &DigestedPage, level: usize) -> io::Result<()>;

    /// Asks for one of `commands`; end of input should yield `Command::Quit`
    fn choose_command(&mut self, commands: &[Command]) -> io::Result<Command>;

    /// Asks for one of `links`; `None` cancels
    fn choose_link(&mut self, links: &[String]) -> io::Result<Option<String>>;

    fn show_help(&mut self, commands: &[Command]) -> io::Result<()>;

    fn copy(&mut self, text: &str) -> io::Result<()>;

    fn notify(&mut self, message: &str) -> io::Result<()>;

    fn progress(&mut self, message: &str);
}

/// Runs the session loop until the user copies or quits
///
/// Returns the final navigation state.
pub async fn run_session<D, U>(
    mut state: NavigationState,
    digester: &mut D,
    ui: &mut U,
) -> Result<NavigationState>
where
    D: PageDigester + ?Sized,
    U: SessionUi + ?Sized,
{
    ui.show_page(state.current(), state.len())?;

    loop {
        let action = match ui.choose_command(&state.commands())? {
            Command::Copy => Action::Copy,
            Command::Quit => Action::Quit,
            Command::Up => Action::Up,
            Command::Help => Action::Help,
            Command::ListLinks => match ui.choose_link(&state.current().found_links)? {
                Some(link) => Action::DrillDown(link),
                None => continue,
            },
        };

        let (next, effect) = transition(state, action);
        state = next;

        let effect = match effect {
            Effect::Digest(request) => {
                tracing::debug!("Drilling down into {}", request.url);
                let result = digester
                    .digest_page(&request, &mut |message: &str| ui.progress(message))
                    .await
                    .map_err(|e| e.to_string());
                let (next, effect) = complete_drill_down(state, result);
                state = next;
                effect
            }
            other => other,
        };

        match effect {
            Effect::CopyAndExit(summary) => {
                match ui.copy(&summary) {
                    Ok(()) => ui.notify("Summary copied to clipboard.")?,
                    Err(e) => ui.notify(&format!("Could not copy to clipboard: {}", e))?,
                }
                break;
            }
            Effect::Exit => break,
            Effect::Display => ui.show_page(state.current(), state.len())?,
            Effect::ShowHelp => ui.show_help(&state.commands())?,
            Effect::Rejected(message) => ui.notify(&message)?,
            Effect::Failed(message) => ui.notify(&format!("Digest failed: {}", message))?,
            // Resolved above
            Effect::Digest(_) => {}
        }
    }

    Ok(state)
}
