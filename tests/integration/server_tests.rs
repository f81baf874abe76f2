//! Integration tests for the prompt API
//!
//! Each test starts the router on an ephemeral port and talks to it over
//! HTTP. Prompt generation goes to a wiremock Gemini server.

use promma::config::LlmConfig;
use promma::llm::GeminiClient;
use promma::server::{router, AppState};
use promma::storage::SqliteStorage;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Starts the API and returns its base URL
async fn start_api(llm: GeminiClient) -> String {
    let state = AppState::new(SqliteStorage::new_in_memory().unwrap(), Arc::new(llm));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    format!("http://{}/api/prompts", addr)
}

fn offline_llm() -> GeminiClient {
    GeminiClient::new(&LlmConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        ..LlmConfig::default()
    })
    .unwrap()
}

async fn create(client: &Client, base: &str, body: Value) -> i64 {
    let response = client.post(base).json(&body).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_prompt_crud() {
    let base = start_api(offline_llm()).await;
    let client = Client::new();

    let id = create(
        &client,
        &base,
        json!({
            "title": "Code review",
            "content": "Review this diff.",
            "category": "dev",
            "tags": "review, git"
        }),
    )
    .await;

    let body: Value = client
        .get(format!("{}/{}", base, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["prompt"]["title"], "Code review");
    assert_eq!(body["prompt"]["category"], "dev");

    let response = client
        .put(format!("{}/{}", base, id))
        .json(&json!({"title": "Code review v2", "content": "Review carefully."}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = client
        .get(format!("{}/{}", base, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["prompt"]["title"], "Code review v2");
    assert_eq!(body["prompt"]["category"], "Uncategorized");

    let response = client
        .delete(format!("{}/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_list_with_filters() {
    let base = start_api(offline_llm()).await;
    let client = Client::new();

    create(
        &client,
        &base,
        json!({"title": "A", "content": "a", "category": "dev", "tags": "Rust"}),
    )
    .await;
    create(
        &client,
        &base,
        json!({"title": "B", "content": "b", "category": "writing"}),
    )
    .await;

    let body: Value = client.get(&base).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["prompts"].as_array().unwrap().len(), 2);

    let body: Value = client
        .get(format!("{}?category=dev", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let prompts = body["prompts"].as_array().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0]["title"], "A");

    let body: Value = client
        .get(format!("{}?tag=rust", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["prompts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_bad_requests() {
    let base = start_api(offline_llm()).await;
    let client = Client::new();

    let response = client
        .post(&base)
        .json(&json!({"title": "No content"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "title and content are required");

    let response = client.get(format!("{}/abc", base)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client.get(format!("{}/0", base)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .put(format!("{}/99", base))
        .json(&json!({"title": "t", "content": "c"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client.delete(format!("{}/99", base)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .get(format!("{}/search?q=", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search() {
    let base = start_api(offline_llm()).await;
    let client = Client::new();

    create(
        &client,
        &base,
        json!({"title": "Translate", "content": "Translate to German"}),
    )
    .await;
    create(&client, &base, json!({"title": "Other", "content": "Unrelated"})).await;

    let body: Value = client
        .get(format!("{}/search?q=german", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let prompts = body["prompts"].as_array().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0]["title"], "Translate");
}

#[tokio::test]
async fn test_preview_echoes_content() {
    let base = start_api(offline_llm()).await;
    let client = Client::new();

    let body: Value = client
        .post(format!("{}/preview", base))
        .json(&json!({"content": "Hello {name}"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"success": true, "preview": "Hello {name}"}));

    let response = client
        .post(format!("{}/preview", base))
        .json(&json!({"content": "  "}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_returns_structured_prompt() {
    let gemini = MockServer::start().await;
    let generated = json!({
        "title": "Bug triage",
        "description": "Classify incoming bug reports",
        "content": "You are a triage assistant...",
        "tags": ["bugs", "triage"]
    });
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": generated.to_string()}]}}]
        })))
        .expect(1)
        .mount(&gemini)
        .await;

    let llm = GeminiClient::new(&LlmConfig {
        api_key: Some("key".to_string()),
        base_url: gemini.uri(),
        ..LlmConfig::default()
    })
    .unwrap();
    let base = start_api(llm).await;

    let body: Value = Client::new()
        .post(format!("{}/generate", base))
        .json(&json!({"input": "help me triage bugs"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], true);
    assert_eq!(body["prompt"], generated);
}

#[tokio::test]
async fn test_generate_without_key_is_server_error() {
    let base = start_api(offline_llm()).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/generate", base))
        .json(&json!({"input": "anything"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = client
        .post(format!("{}/generate", base))
        .json(&json!({"input": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
