//! Login, logout, and current-user handlers.
//!
//! Endpoints:
//! - POST /api/v1/login  - Exchange credentials for a session token
//! - POST /api/v1/logout - Revoke the presented token and expire the cookie
//! - GET  /api/v1/me     - The authenticated user's record

use std::time::Instant;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use parley_types::auth::AuthUser;
use parley_types::error::AuthError;

use crate::http::error::AppError;
use crate::http::extractors::auth::{AuthenticatedUser, session_token};
use crate::http::response::ApiResponse;
use crate::http::session_cookie::{login_cookie, set_cookie_header};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

/// POST /api/v1/login
///
/// Unknown email and wrong password both answer 401 here, so the endpoint
/// does not reveal which emails are registered.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let start = Instant::now();

    let user = state
        .auth_service
        .authenticate(&request.email, &request.password)
        .await
        .map_err(|e| match e {
            AuthError::NotFound | AuthError::InvalidCredentials => {
                AppError::Auth(AuthError::InvalidCredentials)
            }
            other => AppError::Auth(other),
        })?;

    let issued = state.auth_service.issue_token(&user)?;
    let cookie = set_cookie_header(&login_cookie(&issued, state.config.server.secure_cookies))?;
    info!(user_id = user.id, "Login succeeded");

    let body = LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        user,
    };
    Ok(([(SET_COOKIE, cookie)], Json(ApiResponse::success(body, start))))
}

/// POST /api/v1/logout
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let start = Instant::now();

    let token = session_token(&headers)?;
    let expired = state.auth_service.logout(&token)?;
    let cookie = set_cookie_header(&expired)?;

    let body = serde_json::json!({ "logged_out": true });
    Ok(([(SET_COOKIE, cookie)], Json(ApiResponse::success(body, start))))
}

/// GET /api/v1/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<ApiResponse<AuthUser>>, AppError> {
    let start = Instant::now();
    let user = state.auth_service.get_auth_user_by_id(auth.user_id).await?;
    Ok(Json(ApiResponse::success(user, start)))
}
