//! Web digest: crawl a page (and optionally its same-domain links),
//! summarize the result, and navigate between digested pages.

mod assembler;
mod session;

pub use assembler::{
    build_summary_prompt, cap_content, join_sections, DigestOutcome, DigestRequest,
    DigestService, TRUNCATION_MARKER,
};
pub use session::{
    complete_drill_down, run_session, transition, Action, Command, DigestedPage, Effect,
    NavigationState, PageDigester, SessionUi,
};
