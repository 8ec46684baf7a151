//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, Timelike};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::assistant::{Assistant, AssistantReply};
use crate::config::Config;
use crate::error::Error;
use crate::llm::{ChatMessage, OpenRouterClient};
use crate::nlu::Priority;
use crate::quotes;
use crate::store::{NewTask, TaskRecord, TaskStatus, TaskStore, TaskSummary, TaskUpdate};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<TaskStore>,
    pub assistant: Assistant,
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let store = Arc::new(TaskStore::open(&config.db_path)?);

    let llm = match config.openrouter_api_key.clone() {
        Some(key) => Some(Arc::new(OpenRouterClient::new(key)) as Arc<dyn crate::llm::LlmClient>),
        None => {
            tracing::info!("no OPENROUTER_API_KEY set, chat fallback uses canned replies");
            None
        }
    };

    let assistant = Assistant::new(Arc::clone(&store), llm, config.model.clone());

    let addr = config.bind_addr();
    let state = Arc::new(AppState {
        config,
        store,
        assistant,
    });

    let app = build_router(state);

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the router. Split from `serve` so tests can drive it in-process.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/chat/history", get(chat_history).delete(clear_chat_history))
        .route("/api/tasks", post(create_task).get(list_tasks))
        .route("/api/tasks/summary", get(task_summary))
        .route(
            "/api/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/tasks/:id/complete", post(complete_task))
        .route("/api/quote", get(quote))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API-level error with an HTTP status.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(id: i64) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("task {} not found", id))
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Llm(_) => StatusCode::BAD_GATEWAY,
            Error::Store(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("request failed: {}", err);
        }
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<AssistantReply>, ApiError> {
    let reply = state.assistant.process(&req.message).await?;
    Ok(Json(reply))
}

async fn chat_history(State(state): State<Arc<AppState>>) -> Json<Vec<ChatMessage>> {
    Json(state.assistant.history().await)
}

async fn clear_chat_history(State(state): State<Arc<AppState>>) -> StatusCode {
    state.assistant.clear_history().await;
    StatusCode::NO_CONTENT
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(task): Json<NewTask>,
) -> Result<(StatusCode, Json<TaskRecord>), ApiError> {
    if task.title.trim().is_empty() {
        return Err(ApiError::bad_request("title must not be empty"));
    }
    let id = state.store.create(&task)?;
    let record = state.store.get(id)?.ok_or_else(|| ApiError::not_found(id))?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<String>,
    priority: Option<String>,
}

fn parse_status(s: &str) -> Result<TaskStatus, ApiError> {
    match s {
        "pending" => Ok(TaskStatus::Pending),
        "completed" => Ok(TaskStatus::Completed),
        "cancelled" => Ok(TaskStatus::Cancelled),
        other => Err(ApiError::bad_request(format!(
            "unknown status filter: {}",
            other
        ))),
    }
}

fn parse_priority(s: &str) -> Result<Priority, ApiError> {
    match s {
        "low" => Ok(Priority::Low),
        "medium" => Ok(Priority::Medium),
        "high" => Ok(Priority::High),
        other => Err(ApiError::bad_request(format!(
            "unknown priority filter: {}",
            other
        ))),
    }
}

async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TaskRecord>>, ApiError> {
    let status = query.status.as_deref().map(parse_status).transpose()?;
    let priority = query.priority.as_deref().map(parse_priority).transpose()?;
    let tasks = state.store.list(status, priority)?;
    Ok(Json(tasks))
}

async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<TaskRecord>, ApiError> {
    let record = state.store.get(id)?.ok_or_else(|| ApiError::not_found(id))?;
    Ok(Json(record))
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<TaskUpdate>,
) -> Result<Json<TaskRecord>, ApiError> {
    if update.is_empty() {
        return Err(ApiError::bad_request("no fields to update"));
    }
    if !state.store.update(id, &update)? {
        return Err(ApiError::not_found(id));
    }
    let record = state.store.get(id)?.ok_or_else(|| ApiError::not_found(id))?;
    Ok(Json(record))
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete(id)? {
        return Err(ApiError::not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn complete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<TaskRecord>, ApiError> {
    if !state
        .store
        .update(id, &TaskUpdate::status(TaskStatus::Completed))?
    {
        return Err(ApiError::not_found(id));
    }
    let record = state.store.get(id)?.ok_or_else(|| ApiError::not_found(id))?;
    Ok(Json(record))
}

async fn task_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TaskSummary>, ApiError> {
    let summary = state.store.summary(Local::now().naive_local())?;
    Ok(Json(summary))
}

async fn quote(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>, ApiError> {
    let now = Local::now().naive_local();
    let summary = state.store.summary(now)?;
    let quote = quotes::daily_quote(Some(&summary), now.hour());
    Ok(Json(json!({ "quote": quote })))
}
