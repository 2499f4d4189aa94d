//! HTTP API routes.
//!
//! Endpoints:
//!
//! - `GET    /` service banner
//! - `GET    /api/health` health check
//! - `POST   /api/chat` send a message, get a persona response
//! - `GET    /api/personas` persona catalog
//! - `GET    /api/conversations/{session_id}` durable history of a session
//! - `DELETE /api/conversations/{session_id}` clear a session
//! - `GET    /api/sessions` per-session summaries

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use aurora_core::store::{ConversationRecord, ConversationStore, SessionSummary};

use crate::SharedState;

// ── Router ────────────────────────────────────────────────────────────────

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/api/health", get(health_handler))
        .route("/api/chat", axum::routing::post(chat_handler))
        .route("/api/personas", get(personas_handler))
        .route(
            "/api/conversations/{session_id}",
            get(conversation_handler).delete(clear_conversation_handler),
        )
        .route("/api/sessions", get(sessions_handler))
        .with_state(state)
}

// ── DTOs ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BannerResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
    #[serde(default)]
    pub persona_preference: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    /// Display name of the persona that answered
    pub persona_used: String,
    pub persona_key: String,
    pub session_id: String,
    pub message_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PersonaDto {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationHistoryResponse {
    pub session_id: String,
    pub conversations: Vec<ConversationRecord>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
    pub total_sessions: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearConversationResponse {
    pub session_id: String,
    pub deleted_count: u64,
    pub message: String,
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn root_handler() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Aurora Multi-Agent Voice AI Assistant API".into(),
    })
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        service: "Aurora AI Assistant".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = payload.message.trim();
    let session_id = payload.session_id.trim();

    if message.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Message cannot be empty"));
    }
    if session_id.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Session ID cannot be empty"));
    }

    info!(session_id, message_len = message.len(), "Chat request");

    let (message_id, result) = state
        .handle_message(message, session_id, payload.persona_preference.as_deref())
        .await;

    Ok(Json(ChatResponse {
        error: result.error_annotation(),
        response: result.response,
        persona_used: result.persona_name,
        persona_key: result.persona.to_string(),
        session_id: session_id.to_string(),
        message_id,
    }))
}

async fn personas_handler(State(state): State<SharedState>) -> Json<BTreeMap<String, PersonaDto>> {
    let personas: BTreeMap<String, PersonaDto> = state
        .orchestrator
        .registry()
        .all()
        .iter()
        .map(|p| {
            (
                p.key.to_string(),
                PersonaDto {
                    name: p.display_name.clone(),
                    keywords: p.trigger_keywords.clone(),
                },
            )
        })
        .collect();

    Json(personas)
}

fn require_store(state: &SharedState) -> Result<Arc<dyn ConversationStore>, ApiError> {
    state.store.clone().ok_or_else(|| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Conversation store not available",
        )
    })
}

async fn conversation_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<ConversationHistoryResponse>, ApiError> {
    let store = require_store(&state)?;

    let conversations = store.fetch_session(&session_id).await.map_err(|e| {
        warn!(session_id = %session_id, error = %e, "Failed to fetch conversation history");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error retrieving conversation history: {e}"),
        )
    })?;

    let count = conversations.len();
    Ok(Json(ConversationHistoryResponse {
        session_id,
        conversations,
        count,
    }))
}

async fn sessions_handler(
    State(state): State<SharedState>,
) -> Result<Json<SessionListResponse>, ApiError> {
    let store = require_store(&state)?;

    let sessions = store.sessions().await.map_err(|e| {
        warn!(error = %e, "Failed to list sessions");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error retrieving sessions: {e}"),
        )
    })?;

    let total_sessions = sessions.len();
    Ok(Json(SessionListResponse {
        sessions,
        total_sessions,
    }))
}

async fn clear_conversation_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<ClearConversationResponse>, ApiError> {
    let session_id = session_id.trim().to_string();
    if session_id.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Session ID cannot be empty"));
    }

    state.orchestrator.clear_session(&session_id);

    let deleted_count = match &state.store {
        Some(store) => store.delete_session(&session_id).await.map_err(|e| {
            warn!(session_id = %session_id, error = %e, "Failed to delete conversation records");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error clearing conversation: {e}"),
            )
        })?,
        None => 0,
    };

    info!(session_id = %session_id, deleted_count, "Cleared session");

    Ok(Json(ClearConversationResponse {
        message: format!(
            "Successfully cleared {deleted_count} conversations for session {session_id}"
        ),
        session_id,
        deleted_count,
    }))
}
