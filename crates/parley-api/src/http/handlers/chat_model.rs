//! Chat model registry HTTP handlers (read-only).
//!
//! Auth keys never leave the server unmasked.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use parley_types::model::ChatModel;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthenticatedUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ChatModelView {
    pub id: i32,
    pub name: String,
    pub label: String,
    pub is_default: bool,
    pub url: String,
    pub api_auth_header: String,
    pub api_auth_key: String,
}

impl From<&ChatModel> for ChatModelView {
    fn from(model: &ChatModel) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            label: model.label.clone(),
            is_default: model.is_default,
            url: model.url.clone(),
            api_auth_header: model.api_auth_header.clone(),
            api_auth_key: model.masked_key(),
        }
    }
}

/// GET /api/v1/chat-models
pub async fn list_chat_models(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<ChatModelView>>>, AppError> {
    let start = Instant::now();
    let models = state.model_service.list_chat_models().await?;
    let views = models.iter().map(ChatModelView::from).collect();
    Ok(Json(ApiResponse::success(views, start)))
}

/// GET /api/v1/chat-models/default
pub async fn get_default_chat_model(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<ApiResponse<ChatModelView>>, AppError> {
    let start = Instant::now();
    let model = state.model_service.get_default_chat_model().await?;
    Ok(Json(ApiResponse::success(ChatModelView::from(&model), start)))
}
