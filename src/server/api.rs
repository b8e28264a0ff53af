//! Route handlers for the chat relay.
//!
//! Two routes:
//! - GET /         — static chat page
//! - POST /api/chat — streamed chat completion (plain-text body)

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::chat::message::{strip_system_messages, ChatMessage};
use crate::chat::profile::{ModelProfile, DEFAULT_SELECTOR};
use crate::server::streaming::delta_body_stream;
use crate::upstream::client::CompletionBackend;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Application state shared across handlers.
pub struct AppState {
    pub backend: Arc<dyn CompletionBackend>,
}

/// Build the axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/chat", post(chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Chat request from the browser. Both fields are optional: an absent
/// selector falls back to the default profile, absent messages to an
/// empty conversation. Entries with an unknown role fail deserialization
/// and are rejected by the extractor.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn chat(State(state): State<Arc<AppState>>, Json(req): Json<ChatRequest>) -> Response {
    let request_id = Uuid::new_v4();

    let profile = ModelProfile::resolve(req.model.as_deref().unwrap_or(DEFAULT_SELECTOR));
    let history = strip_system_messages(req.messages);

    info!(
        %request_id,
        model = profile.model_id,
        messages = history.len(),
        "Chat completion request"
    );

    match state
        .backend
        .stream_chat(profile.model_id, &history, &profile.params)
        .await
    {
        Ok(deltas) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain")],
            Body::from_stream(delta_body_stream(deltas, request_id)),
        )
            .into_response(),
        Err(e) => {
            error!(%request_id, error = %e, "Upstream request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
