//! Session history and message HTTP handlers.
//!
//! Endpoints:
//! - GET /api/v1/sessions/{uuid}/history  - Prompts block followed by one page of messages
//! - GET /api/v1/sessions/{uuid}/messages - One raw page of messages
//! - GET /api/v1/messages/{uuid}          - A single message
//!
//! Sessions belonging to another user answer 404. Unknown sessions yield
//! empty listings, the same as a session with no turns yet.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::warn;

use parley_core::repository::session::ChatSessionRepository;
use parley_types::chat::ChatMessage;
use parley_types::error::ChatError;
use parley_types::history::SimpleChatMessage;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthenticatedUser;
use crate::http::extractors::query::PageQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

async fn ensure_session_access(
    state: &AppState,
    session_uuid: &str,
    user_id: i32,
) -> Result<(), AppError> {
    let session = state
        .session_repo
        .get_by_uuid(session_uuid)
        .await
        .map_err(ChatError::storage("fail to get session"))?;

    match session {
        Some(session) if session.user_id != user_id => {
            warn!(session_uuid, user_id, "Rejected access to another user's session");
            Err(ChatError::NotFound(format!("chat session {session_uuid}")).into())
        }
        _ => Ok(()),
    }
}

fn page_link(session_uuid: &str, kind: &str, page: i32, page_size: i32) -> String {
    format!(
        "/api/v1/sessions/{session_uuid}/{kind}?page={}&page_size={page_size}",
        page.saturating_add(1)
    )
}

/// GET /api/v1/sessions/{uuid}/history
pub async fn get_history(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(session_uuid): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<SimpleChatMessage>>>, AppError> {
    let start = Instant::now();
    ensure_session_access(&state, &session_uuid, auth.user_id).await?;

    let (page, page_size) = query.resolve(state.config.history.default_page_size);
    let history = state
        .message_service
        .get_chat_history_by_session(&session_uuid, page, page_size)
        .await?;

    let resp = ApiResponse::success(history, start)
        .with_link("next", &page_link(&session_uuid, "history", page, page_size));
    Ok(Json(resp))
}

/// GET /api/v1/sessions/{uuid}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(session_uuid): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, AppError> {
    let start = Instant::now();
    ensure_session_access(&state, &session_uuid, auth.user_id).await?;

    let (page, page_size) = query.resolve(state.config.history.default_page_size);
    let messages = state
        .message_service
        .get_chat_messages_by_session(&session_uuid, page, page_size)
        .await?;

    let resp = ApiResponse::success(messages, start)
        .with_link("next", &page_link(&session_uuid, "messages", page, page_size));
    Ok(Json(resp))
}

/// GET /api/v1/messages/{uuid}
pub async fn get_message(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(uuid): Path<String>,
) -> Result<Json<ApiResponse<ChatMessage>>, AppError> {
    let start = Instant::now();

    let message = state.message_service.get_chat_message_by_uuid(&uuid).await?;
    ensure_session_access(&state, &message.chat_session_uuid, auth.user_id).await?;

    Ok(Json(ApiResponse::success(message, start)))
}
