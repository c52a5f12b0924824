//! HTTP request handlers

use super::assets::{get_index_html, serve_static};
use super::types::{ChatRequest, ErrorResponse, TOO_MANY_MESSAGES};
use super::AppState;
use crate::message::Message;
use crate::session::MAX_HISTORY;
use crate::story_prompt::build_story_request;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root serves the story page
        .route("/", get(serve_page))
        // Static assets (embedded or filesystem fallback)
        .route("/assets/*path", get(serve_static))
        // Story turns
        .route("/api/chat", post(chat))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Page Handler
// ============================================================

async fn serve_page() -> impl IntoResponse {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - UI not found</h1>".to_string()),
        )
            .into_response(),
    }
}

// ============================================================
// Story Turns
// ============================================================

/// Forward one story turn upstream and return the model's message
async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<Message>, AppError> {
    if req.messages.len() >= MAX_HISTORY {
        tracing::warn!(
            messages = req.messages.len(),
            limit = MAX_HISTORY,
            "Rejecting story over history ceiling"
        );
        return Err(AppError::BadRequest(TOO_MANY_MESSAGES.to_string()));
    }

    let llm = state.llm.as_ref().ok_or_else(|| {
        AppError::Unavailable("Story model is not configured (set OPENROUTER_API_KEY)".to_string())
    })?;

    let request = build_story_request(req.system.as_deref(), &req.messages);
    let response = llm
        .complete(&request)
        .await
        .map_err(|e| AppError::Upstream(e.message))?;

    Ok(Json(response.message))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("story-weaver ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Upstream(String),
    Unavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
