//! Integration tests for the web digest
//!
//! Gemini is replaced by a wiremock server. Pages come either from an
//! in-memory fetcher (for real-looking hostnames) or from wiremock through
//! the HTTP fetcher.

use async_trait::async_trait;
use promma::config::{DigestConfig, LlmConfig};
use promma::crawler::{FetchResult, HttpFetcher, PageFetcher};
use promma::digest::{run_session, DigestRequest, TRUNCATION_MARKER};
use promma::llm::GeminiClient;
use promma::storage::{SqliteStorage, Storage};
use promma::{DigestService, DigestedPage, NavigationState, PrommaError};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves fixed HTML by URL and records every fetch
#[derive(Default)]
struct SiteFetcher {
    pages: HashMap<String, String>,
    fetched: Mutex<Vec<String>>,
}

impl SiteFetcher {
    fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for SiteFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult {
        self.fetched.lock().unwrap().push(url.to_string());
        match self.pages.get(url.as_str()) {
            Some(body) => FetchResult::Success {
                final_url: url.to_string(),
                status_code: 200,
                body: body.clone(),
            },
            None => FetchResult::HttpError { status_code: 404 },
        }
    }
}

fn gemini_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
    })
}

async fn mount_gemini(server: &MockServer, summary: &str) {
    Mock::given(method("POST"))
        .and(path_regex(r":generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(summary)))
        .mount(server)
        .await;
}

fn gemini(server: &MockServer, api_key: Option<&str>) -> GeminiClient {
    GeminiClient::new(&LlmConfig {
        api_key: api_key.map(str::to_string),
        base_url: server.uri(),
        ..LlmConfig::default()
    })
    .unwrap()
}

fn service<F: PageFetcher>(
    fetcher: F,
    llm: GeminiClient,
) -> DigestService<F, GeminiClient, SqliteStorage> {
    DigestService::new(
        fetcher,
        llm,
        SqliteStorage::new_in_memory().unwrap(),
        DigestConfig::default(),
    )
}

/// Text of the prompt sent in the first recorded Gemini request
async fn sent_prompt(server: &MockServer) -> String {
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .to_string()
}

fn docs_site() -> SiteFetcher {
    SiteFetcher::default()
        .page(
            "https://docs.example.com/intro",
            r#"<html><body>
                <h1>Introduction</h1>
                <p>Welcome to the docs.</p>
                <a href="/guide">Guide</a>
                <a href="https://docs.example.com/api">API</a>
                <a href="https://github.com/example/docs">Source</a>
                <a href="/guide">Guide again</a>
            </body></html>"#,
        )
        .page(
            "https://docs.example.com/guide",
            r#"<html><body><p>The guide explains setup.</p><a href="/api">API</a></body></html>"#,
        )
        .page(
            "https://docs.example.com/api",
            "<html><body><p>The API reference.</p></body></html>",
        )
}

#[tokio::test]
async fn test_recursive_digest_end_to_end() {
    let llm_server = MockServer::start().await;
    mount_gemini(&llm_server, "# Docs\n- setup\n- api").await;

    let mut service = service(docs_site(), gemini(&llm_server, Some("key")));
    let request = DigestRequest::new("https://docs.example.com/intro").with_max_depth(1);

    let mut messages = Vec::new();
    let outcome = service
        .digest(&request, &mut |m: &str| messages.push(m.to_string()))
        .await
        .unwrap();

    assert_eq!(outcome.summary, "# Docs\n- setup\n- api");
    assert_eq!(outcome.url, "https://docs.example.com/intro");
    assert_eq!(
        outcome.found_links,
        vec![
            "https://docs.example.com/guide".to_string(),
            "https://docs.example.com/api".to_string(),
        ]
    );

    // The seed, then each same-domain link once; the external link is never requested
    let fetched = service.fetcher().fetched();
    assert_eq!(
        fetched,
        vec![
            "https://docs.example.com/intro",
            "https://docs.example.com/guide",
            "https://docs.example.com/api",
        ]
    );
    assert_eq!(progress_fetches(&messages), fetched);
    assert!(messages.iter().any(|m| m == "Summarizing content..."));

    let history = service.storage().list_history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].url, "https://docs.example.com/intro");
    assert_eq!(history[0].summary, "# Docs\n- setup\n- api");

    let prompt = sent_prompt(&llm_server).await;
    assert!(prompt.contains("--- Source: https://docs.example.com/intro ---"));
    assert!(prompt.contains("--- Source: https://docs.example.com/guide ---"));
    assert!(prompt.contains("--- Source: https://docs.example.com/api ---"));
    assert!(!prompt.contains("github.com"));
    assert_eq!(prompt.matches("The API reference.").count(), 1);
}

/// URLs from the "Fetching" progress lines, in order
fn progress_fetches(messages: &[String]) -> Vec<&str> {
    messages
        .iter()
        .filter_map(|m| m.split_once("Fetching ").map(|(_, url)| url))
        .collect()
}

#[tokio::test]
async fn test_depth_zero_fetches_seed_only() {
    let llm_server = MockServer::start().await;
    mount_gemini(&llm_server, "summary").await;

    let site = docs_site();
    let mut service = service(site, gemini(&llm_server, Some("key")));
    let mut messages = Vec::new();
    let outcome = service
        .digest(
            &DigestRequest::new("https://docs.example.com/intro"),
            &mut |m: &str| messages.push(m.to_string()),
        )
        .await
        .unwrap();

    assert_eq!(
        service.fetcher().fetched(),
        vec!["https://docs.example.com/intro"]
    );
    assert_eq!(messages[0], "[0%] Fetching https://docs.example.com/intro");
    // Links are still reported for drill-down
    assert_eq!(outcome.found_links.len(), 2);
}

#[tokio::test]
async fn test_instruction_prefixes_prompt() {
    let llm_server = MockServer::start().await;
    mount_gemini(&llm_server, "résumé").await;

    let mut service = service(docs_site(), gemini(&llm_server, Some("key")));
    let request = DigestRequest::new("https://docs.example.com/intro")
        .with_instruction(Some("Answer in French.".to_string()));
    service.digest(&request, &mut |_: &str| {}).await.unwrap();

    let prompt = sent_prompt(&llm_server).await;
    assert!(prompt.starts_with("Answer in French.\n\n"));

    let history = service.storage().list_history().unwrap();
    assert_eq!(history[0].instruction.as_deref(), Some("Answer in French."));
}

#[tokio::test]
async fn test_content_truncated_to_cap() {
    let llm_server = MockServer::start().await;
    mount_gemini(&llm_server, "summary").await;

    let long_text = "x".repeat(500);
    let site = SiteFetcher::default().page(
        "https://long.example.com/",
        &format!("<p>{}</p>", long_text),
    );
    let mut service = DigestService::new(
        site,
        gemini(&llm_server, Some("key")),
        SqliteStorage::new_in_memory().unwrap(),
        DigestConfig {
            max_content_chars: 100,
            ..DigestConfig::default()
        },
    );

    service
        .digest(&DigestRequest::new("https://long.example.com/"), &mut |_: &str| {})
        .await
        .unwrap();

    let prompt = sent_prompt(&llm_server).await;
    let expected = format!(
        "{}{}",
        &format!("--- Source: https://long.example.com/ ---\n{}", long_text)[..100],
        TRUNCATION_MARKER
    );
    assert!(prompt.contains(&expected));
    assert!(!prompt.contains(&long_text));
}

#[tokio::test]
async fn test_single_page_uses_smaller_cap_and_no_recursion() {
    let llm_server = MockServer::start().await;
    mount_gemini(&llm_server, "summary").await;

    let big = "y".repeat(20_000);
    let site = SiteFetcher::default().page(
        "https://docs.example.com/big",
        &format!("<p>{}</p><a href=\"/other\">other</a>", big),
    );
    let mut service = service(site, gemini(&llm_server, Some("key")));

    let mut messages = Vec::new();
    service
        .digest(
            &DigestRequest::new("https://docs.example.com/big").single_page(true),
            &mut |m: &str| messages.push(m.to_string()),
        )
        .await
        .unwrap();

    assert_eq!(
        service.fetcher().fetched(),
        vec!["https://docs.example.com/big"]
    );
    let prompt = sent_prompt(&llm_server).await;
    assert!(prompt.contains(TRUNCATION_MARKER));
    assert!(!prompt.contains(&"y".repeat(10_000)));
}

#[tokio::test]
async fn test_empty_content_records_no_history() {
    let llm_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("unused")))
        .expect(0)
        .mount(&llm_server)
        .await;

    let site = SiteFetcher::default().page(
        "https://empty.example.com/",
        "<html><body><script>var x = 1;</script></body></html>",
    );
    let mut service = service(site, gemini(&llm_server, Some("key")));

    let mut messages = Vec::new();
    let err = service
        .digest(
            &DigestRequest::new("https://empty.example.com/"),
            &mut |m: &str| messages.push(m.to_string()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PrommaError::EmptyContent { .. }));
    assert!(messages
        .iter()
        .any(|m| m == "Warning: no content extracted from https://empty.example.com/"));
    assert!(service.storage().list_history().unwrap().is_empty());
}

#[tokio::test]
async fn test_llm_failure_records_no_history() {
    let llm_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&llm_server)
        .await;

    let mut service = service(docs_site(), gemini(&llm_server, Some("key")));
    let err = service
        .digest(
            &DigestRequest::new("https://docs.example.com/intro"),
            &mut |_: &str| {},
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PrommaError::Llm(_)));
    assert!(service.storage().list_history().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_api_key_fetches_nothing() {
    let llm_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("unused")))
        .expect(0)
        .mount(&llm_server)
        .await;

    let mut service = service(docs_site(), gemini(&llm_server, None));
    let mut messages = Vec::new();
    let err = service
        .digest(
            &DigestRequest::new("https://docs.example.com/intro"),
            &mut |m: &str| messages.push(m.to_string()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PrommaError::Config(_)));
    assert!(messages.is_empty());
    assert!(service.fetcher().fetched().is_empty());
}

#[tokio::test]
async fn test_invalid_seed_rejected() {
    let llm_server = MockServer::start().await;
    let mut service = service(docs_site(), gemini(&llm_server, Some("key")));

    let err = service
        .digest(&DigestRequest::new("ftp://docs.example.com/"), &mut |_: &str| {})
        .await
        .unwrap_err();
    assert!(matches!(err, PrommaError::UrlError(_)));
}

#[tokio::test]
async fn test_http_fetcher_against_live_pages() {
    let site = MockServer::start().await;
    let llm_server = MockServer::start().await;
    mount_gemini(&llm_server, "summary").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><p>Home page.</p><a href="/a">A</a><a href="/missing">gone</a></body></html>"#,
        ))
        .expect(1)
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><p>Page A.</p><a href="/">home</a></body></html>"#,
        ))
        .expect(1)
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&site)
        .await;

    let fetcher = HttpFetcher::new(&DigestConfig::default()).unwrap();
    let mut service = service(fetcher, gemini(&llm_server, Some("key")));
    let seed = format!("{}/", site.uri());

    let mut messages = Vec::new();
    let outcome = service
        .digest(
            &DigestRequest::new(seed.clone()).with_max_depth(3),
            &mut |m: &str| messages.push(m.to_string()),
        )
        .await
        .unwrap();

    assert_eq!(outcome.url, seed);
    assert!(messages
        .iter()
        .any(|m| m.starts_with("Warning: failed to fetch") && m.ends_with("HTTP 404")));

    let prompt = sent_prompt(&llm_server).await;
    assert!(prompt.contains("Home page."));
    assert!(prompt.contains("Page A."));
}

#[tokio::test]
async fn test_session_drill_down_and_up_through_service() {
    use promma::digest::{Command, SessionUi};
    use std::io;

    struct Script {
        commands: Vec<Command>,
        shown: Vec<DigestedPage>,
    }

    impl SessionUi for Script {
        fn show_page(&mut self, page: &DigestedPage, _level: usize) -> io::Result<()> {
            self.shown.push(page.clone());
            Ok(())
        }

        fn choose_command(&mut self, _commands: &[Command]) -> io::Result<Command> {
            Ok(self.commands.remove(0))
        }

        fn choose_link(&mut self, links: &[String]) -> io::Result<Option<String>> {
            Ok(links.first().cloned())
        }

        fn show_help(&mut self, _commands: &[Command]) -> io::Result<()> {
            Ok(())
        }

        fn copy(&mut self, _text: &str) -> io::Result<()> {
            Ok(())
        }

        fn notify(&mut self, _message: &str) -> io::Result<()> {
            Ok(())
        }

        fn progress(&mut self, _message: &str) {}
    }

    let llm_server = MockServer::start().await;
    mount_gemini(&llm_server, "summary").await;

    let mut service = service(docs_site(), gemini(&llm_server, Some("key")));
    let request = DigestRequest::new("https://docs.example.com/intro").with_max_depth(1);
    let outcome = service.digest(&request, &mut |_: &str| {}).await.unwrap();
    let first = DigestedPage::from_outcome(outcome, &request);

    let mut ui = Script {
        commands: vec![Command::ListLinks, Command::Up, Command::Quit],
        shown: Vec::new(),
    };
    let state = run_session(NavigationState::new(first.clone()), &mut service, &mut ui)
        .await
        .unwrap();

    assert_eq!(state.len(), 1);
    assert_eq!(ui.shown.len(), 3);
    assert_eq!(ui.shown[1].url, "https://docs.example.com/guide");
    assert_eq!(ui.shown[1].depth, 0);
    assert_eq!(ui.shown[2], first);

    // One entry for the first digest and one for the drill-down
    assert_eq!(service.storage().list_history().unwrap().len(), 2);
}
