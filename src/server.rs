//! Thin HTTP API over the prompt library
//!
//! All routes live under `/api/prompts` and answer with a JSON object
//! carrying a `success` flag.

use crate::library::{generate_prompt, GeneratedPrompt};
use crate::llm::LlmClient;
use crate::storage::{NewPrompt, PromptFilter, SqliteStorage, Storage, StorageResult};
use crate::{PrommaError, Result};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    storage: Arc<Mutex<SqliteStorage>>,
    llm: Arc<dyn LlmClient>,
}

impl AppState {
    pub fn new(storage: SqliteStorage, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
            llm,
        }
    }

    /// Runs `f` with the storage lock held; the lock is never held across an await
    fn with_storage<T>(
        &self,
        f: impl FnOnce(&mut SqliteStorage) -> StorageResult<T>,
    ) -> std::result::Result<T, ApiError> {
        let mut storage = self
            .storage
            .lock()
            .map_err(|_| internal_error("storage lock poisoned"))?;
        f(&mut storage).map_err(|e| internal_error(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);
type ApiResult = std::result::Result<(StatusCode, Json<Value>), ApiError>;

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            success: false,
            error: message.into(),
        }),
    )
}

fn bad_request(message: impl Into<String>) -> ApiError {
    error(StatusCode::BAD_REQUEST, message)
}

fn not_found(message: impl Into<String>) -> ApiError {
    error(StatusCode::NOT_FOUND, message)
}

fn internal_error(message: impl Into<String>) -> ApiError {
    error(StatusCode::INTERNAL_SERVER_ERROR, message)
}

fn ok(body: Value) -> ApiResult {
    Ok((StatusCode::OK, Json(body)))
}

fn parse_id(raw: &str) -> std::result::Result<i64, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| bad_request("invalid ID"))
}

fn check_required(prompt: &NewPrompt) -> std::result::Result<(), ApiError> {
    if prompt.title.trim().is_empty() || prompt.content.trim().is_empty() {
        return Err(bad_request("title and content are required"));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    category: Option<String>,
    tag: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
struct GenerateBody {
    #[serde(default)]
    input: String,
}

#[derive(Debug, Deserialize)]
struct PreviewBody {
    #[serde(default)]
    content: String,
}

async fn list_prompts(State(state): State<AppState>, Query(query): Query<ListQuery>) -> ApiResult {
    let filter = PromptFilter {
        category: query.category.filter(|c| !c.is_empty()),
        tag: query.tag.filter(|t| !t.is_empty()),
    };
    let prompts = state.with_storage(|s| s.list_prompts(&filter))?;
    ok(json!({"success": true, "prompts": prompts}))
}

async fn search_prompts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult {
    let keyword = query.q.trim().to_string();
    if keyword.is_empty() {
        return Err(bad_request("search keyword cannot be empty"));
    }
    let prompts = state.with_storage(|s| s.search_prompts(&keyword))?;
    ok(json!({"success": true, "prompts": prompts}))
}

async fn get_prompt(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let id = parse_id(&id)?;
    match state.with_storage(|s| s.get_prompt(id))? {
        Some(prompt) => ok(json!({"success": true, "prompt": prompt})),
        None => Err(not_found("prompt not found")),
    }
}

async fn create_prompt(State(state): State<AppState>, Json(body): Json<NewPrompt>) -> ApiResult {
    check_required(&body)?;
    let id = state.with_storage(|s| s.create_prompt(&body))?;
    tracing::info!("Created prompt {} via API", id);
    Ok((StatusCode::CREATED, Json(json!({"success": true, "id": id}))))
}

async fn update_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<NewPrompt>,
) -> ApiResult {
    let id = parse_id(&id)?;
    check_required(&body)?;
    if state.with_storage(|s| s.update_prompt(id, &body))? {
        ok(json!({"success": true}))
    } else {
        Err(not_found("prompt not found"))
    }
}

async fn delete_prompt(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let id = parse_id(&id)?;
    if state.with_storage(|s| s.delete_prompt(id))? {
        ok(json!({"success": true}))
    } else {
        Err(not_found("prompt not found"))
    }
}

async fn generate(State(state): State<AppState>, Json(body): Json<GenerateBody>) -> ApiResult {
    if body.input.trim().is_empty() {
        return Err(bad_request("input is required to generate a prompt"));
    }
    match generate_prompt(state.llm.as_ref(), &body.input).await {
        Ok(GeneratedPrompt::Structured(prompt)) => ok(json!({"success": true, "prompt": prompt})),
        Ok(GeneratedPrompt::Raw(text)) => ok(json!({"success": true, "text": text})),
        Err(e) => {
            tracing::warn!("Prompt generation failed: {}", e);
            Err(internal_error(e.to_string()))
        }
    }
}

async fn preview(Json(body): Json<PreviewBody>) -> ApiResult {
    if body.content.trim().is_empty() {
        return Err(bad_request("content is required to preview a prompt"));
    }
    ok(json!({"success": true, "preview": body.content}))
}

/// Builds the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/prompts", get(list_prompts).post(create_prompt))
        .route("/api/prompts/search", get(search_prompts))
        .route("/api/prompts/generate", post(generate))
        .route("/api/prompts/preview", post(preview))
        .route(
            "/api/prompts/{id}",
            get(get_prompt).put(update_prompt).delete(delete_prompt),
        )
        .with_state(state)
}

/// Serves the API on `addr` until the process is stopped
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    tracing::info!("Listening on http://{}", local);
    println!("promma API listening on http://{}/api/prompts", local);

    axum::serve(listener, router(state))
        .await
        .map_err(PrommaError::Io)
}
