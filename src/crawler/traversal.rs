//! Bounded depth-first traversal
//!
//! A crawl starts at one seed URL and follows same-domain links up to a
//! fixed number of hops. Pages are fetched one at a time in depth-first
//! preorder; a page is never fetched twice within one crawl.

use crate::crawler::fetcher::{FetchResult, PageFetcher};
use crate::crawler::parser::{extract_page, ExtractOptions};
use crate::url::SeedUrl;
use std::collections::HashSet;
use url::Url;

/// Text extracted from one page, tagged with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSection {
    pub url: String,
    pub text: String,
}

/// Traversal parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct CrawlOptions {
    /// Maximum hops from the seed; 0 fetches the seed only
    pub max_depth: u32,

    pub extract: ExtractOptions,
}

/// Everything a crawl produced
#[derive(Debug, Clone, Default)]
pub struct CrawlOutput {
    /// One section per page that yielded text, in visit order
    pub sections: Vec<ContentSection>,

    /// Every qualifying link seen on any fetched page, first-seen order
    pub links: Vec<String>,

    /// Pages requested, including failed ones
    pub pages_fetched: usize,
}

impl CrawlOutput {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Collects sections and links while the traversal runs
#[derive(Debug, Default)]
struct CrawlAccumulator {
    output: CrawlOutput,
    seen_links: HashSet<String>,
}

impl CrawlAccumulator {
    fn add_section(&mut self, url: &Url, text: String) {
        self.output.sections.push(ContentSection {
            url: url.to_string(),
            text,
        });
    }

    fn add_links(&mut self, links: &[Url]) {
        for link in links {
            if self.seen_links.insert(link.as_str().to_string()) {
                self.output.links.push(link.to_string());
            }
        }
    }

    fn finish(self) -> CrawlOutput {
        self.output
    }
}

/// Share of the depth budget already spent, as a whole percentage
fn progress_percent(max_depth: u32, remaining: u32) -> u32 {
    if max_depth == 0 {
        return 0;
    }
    (max_depth - remaining) * 100 / max_depth
}

/// Crawls from `seed`, reporting progress through `progress`
///
/// Fetch failures and pages without text are reported as warnings and never
/// abort the traversal. A failed page is not explored for links.
pub async fn crawl<F>(
    fetcher: &F,
    seed: &SeedUrl,
    options: CrawlOptions,
    progress: &mut dyn FnMut(&str),
) -> CrawlOutput
where
    F: PageFetcher + ?Sized,
{
    let mut visited: HashSet<String> = HashSet::new();
    let mut acc = CrawlAccumulator::default();
    let mut stack: Vec<(Url, u32)> = vec![(seed.url.clone(), options.max_depth)];

    while let Some((url, remaining)) = stack.pop() {
        if !visited.insert(url.as_str().to_string()) {
            continue;
        }

        let message = format!(
            "[{}%] Fetching {}",
            progress_percent(options.max_depth, remaining),
            url
        );
        tracing::debug!("{}", message);
        progress(&message);

        acc.output.pages_fetched += 1;
        let (final_url, body) = match fetcher.fetch(&url).await {
            FetchResult::Success {
                final_url, body, ..
            } => (final_url, body),
            failed => {
                let reason = failed.failure_reason().unwrap_or_default();
                let message = format!("Warning: failed to fetch {}: {}", url, reason);
                tracing::warn!("{}", message);
                progress(&message);
                continue;
            }
        };

        // Relative links resolve against where the page actually lives
        let base = match Url::parse(&final_url) {
            Ok(base) => base,
            Err(_) => url.clone(),
        };
        if base != url {
            tracing::debug!("{} redirected to {}", url, base);
        }
        let page = extract_page(&body, &base, &seed.host, options.extract);

        if page.has_text() {
            acc.add_section(&url, page.text);
        } else {
            let message = format!("Warning: no content extracted from {}", url);
            tracing::warn!("{}", message);
            progress(&message);
        }

        acc.add_links(&page.links);

        if remaining > 0 {
            // Reversed so the first link is popped, and fully explored, first
            for link in page.links.into_iter().rev() {
                if !visited.contains(link.as_str()) {
                    stack.push((link, remaining - 1));
                }
            }
        }
    }

    let output = acc.finish();
    tracing::debug!(
        "Crawl of {} finished: {} pages fetched, {} with content, {} links",
        seed.url,
        output.pages_fetched,
        output.sections.len(),
        output.links.len()
    );
    output
}
