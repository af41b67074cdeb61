//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/` except `/health`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Auth
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::me))
        // History
        .route(
            "/sessions/{uuid}/history",
            get(handlers::history::get_history),
        )
        .route(
            "/sessions/{uuid}/messages",
            get(handlers::history::get_messages),
        )
        .route("/messages/{uuid}", get(handlers::history::get_message))
        // Chat models
        .route("/chat-models", get(handlers::chat_model::list_chat_models))
        .route(
            "/chat-models/default",
            get(handlers::chat_model::get_default_chat_model),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{HeaderMap, Request, StatusCode, header};
    use http_body_util::BodyExt;
    use parley_core::repository::session::ChatSessionRepository;
    use parley_types::auth::NewAuthUser;
    use parley_types::chat::{CreateChatPromptParams, CreateChatSessionParams, MessageRole};
    use parley_types::config::ParleyConfig;
    use parley_types::model::CreateChatModelParams;
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const PASSWORD: &str = "correct horse battery";

    async fn test_app() -> (Router, AppState, TempDir) {
        let tmp = TempDir::new().unwrap();
        let mut config = ParleyConfig::default();
        config.jwt.secret = "router-test-secret".to_string();
        let state = AppState::init(config, tmp.path().to_path_buf())
            .await
            .unwrap();
        (build_router(state.clone()), state, tmp)
    }

    async fn seed_user(state: &AppState, email: &str) -> i32 {
        state
            .auth_service
            .create_auth_user(&NewAuthUser {
                email: email.to_string(),
                password: PASSWORD.to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_session(state: &AppState, user_id: i32, session_uuid: &str) {
        state
            .session_repo
            .create(&CreateChatSessionParams {
                uuid: session_uuid.to_string(),
                user_id,
                topic: "router test".to_string(),
            })
            .await
            .unwrap();
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, body)
    }

    fn login_request(email: &str, password: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "email": email, "password": password }).to_string(),
            ))
            .unwrap()
    }

    fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn login(app: &Router, email: &str) -> String {
        let (status, _, body) = send(app, login_request(email, PASSWORD)).await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (app, _state, _tmp) = test_app().await;
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, _, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_login_sets_cookie_and_hides_password() {
        let (app, state, _tmp) = test_app().await;
        seed_user(&state, "ada@example.com").await;

        let (status, headers, body) = send(&app, login_request("ada@example.com", PASSWORD)).await;
        assert_eq!(status, StatusCode::OK);

        let token = body["data"]["token"].as_str().unwrap();
        let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with(&format!("jwt={token}")));
        assert!(cookie.contains("HttpOnly"));

        assert_eq!(body["data"]["user"]["email"], "ada@example.com");
        assert!(body["data"]["user"].get("password").is_none());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (app, state, _tmp) = test_app().await;
        seed_user(&state, "ada@example.com").await;

        let (wrong_pw, _, wrong_body) =
            send(&app, login_request("ada@example.com", "nope")).await;
        let (unknown, _, unknown_body) =
            send(&app, login_request("nobody@example.com", "x")).await;

        assert_eq!(wrong_pw, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown, StatusCode::UNAUTHORIZED);
        assert_eq!(
            wrong_body["errors"][0]["message"],
            unknown_body["errors"][0]["message"]
        );
    }

    #[tokio::test]
    async fn test_history_prompts_block_then_messages() {
        let (app, state, _tmp) = test_app().await;
        let user_id = seed_user(&state, "ada@example.com").await;
        seed_session(&state, user_id, "s1").await;

        state
            .prompt_service
            .create_chat_prompt(&CreateChatPromptParams {
                chat_session_uuid: "s1".to_string(),
                uuid: "p0".to_string(),
                role: MessageRole::System,
                content: "You are terse.".to_string(),
                token_count: 4,
            })
            .await
            .unwrap();
        for (uuid, role) in [("m0", MessageRole::User), ("m1", MessageRole::Assistant)] {
            state
                .message_service
                .add_message("s1", uuid, role, uuid, Value::Null)
                .await
                .unwrap();
        }

        let token = login(&app, "ada@example.com").await;
        let (status, _, body) = send(
            &app,
            authed("GET", "/api/v1/sessions/s1/history?page=1&page_size=10", &token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let uuids: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["uuid"].as_str().unwrap())
            .collect();
        assert_eq!(uuids, vec!["p0", "m0", "m1"]);
        assert_eq!(body["data"][0]["isPrompt"], true);
        assert_eq!(body["data"][1]["inversion"], true);
        assert_eq!(body["data"][2]["inversion"], false);
        assert_eq!(
            body["_links"]["next"],
            "/api/v1/sessions/s1/history?page=2&page_size=10"
        );
    }

    #[tokio::test]
    async fn test_messages_page_uses_row_offset() {
        let (app, state, _tmp) = test_app().await;
        let user_id = seed_user(&state, "ada@example.com").await;
        seed_session(&state, user_id, "s1").await;
        for i in 0..3 {
            state
                .message_service
                .add_message("s1", &format!("m{i}"), MessageRole::User, "hi", Value::Null)
                .await
                .unwrap();
        }

        let token = login(&app, "ada@example.com").await;
        let (status, _, body) = send(
            &app,
            authed("GET", "/api/v1/sessions/s1/messages?page=2&page_size=2", &token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let uuids: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["uuid"].as_str().unwrap())
            .collect();
        assert_eq!(uuids, vec!["m1", "m2"]);
    }

    #[tokio::test]
    async fn test_invalid_page_is_bad_request() {
        let (app, state, _tmp) = test_app().await;
        seed_user(&state, "ada@example.com").await;
        let token = login(&app, "ada@example.com").await;

        let (status, _, body) = send(
            &app,
            authed("GET", "/api/v1/sessions/s1/history?page=0", &token),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let (app, _state, _tmp) = test_app().await;
        let request = Request::builder()
            .uri("/api/v1/sessions/s1/history")
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _, _) = send(&app, authed("GET", "/api/v1/me", "not.a.token")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_other_users_session_is_hidden() {
        let (app, state, _tmp) = test_app().await;
        let owner = seed_user(&state, "owner@example.com").await;
        seed_user(&state, "other@example.com").await;
        seed_session(&state, owner, "private").await;
        state
            .message_service
            .add_message("private", "secret-msg", MessageRole::User, "mine", Value::Null)
            .await
            .unwrap();

        let token = login(&app, "other@example.com").await;
        let (status, _, _) = send(
            &app,
            authed("GET", "/api/v1/sessions/private/history", &token),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = send(&app, authed("GET", "/api/v1/messages/secret-msg", &token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let owner_token = login(&app, "owner@example.com").await;
        let (status, _, body) = send(
            &app,
            authed("GET", "/api/v1/messages/secret-msg", &owner_token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["content"], "mine");
    }

    #[tokio::test]
    async fn test_logout_expires_cookie_and_revokes_token() {
        let (app, state, _tmp) = test_app().await;
        let user_id = seed_user(&state, "ada@example.com").await;
        let token = login(&app, "ada@example.com").await;

        let (status, _, _) = send(&app, authed("GET", "/api/v1/me", &token)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, headers, body) = send(&app, authed("POST", "/api/v1/logout", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["logged_out"], true);
        let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with(&format!("jwt={user_id}")));

        let (status, _, body) = send(&app, authed("GET", "/api/v1/me", &token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(
            body["errors"][0]["message"]
                .as_str()
                .unwrap()
                .contains("token revoked")
        );
    }

    #[tokio::test]
    async fn test_logout_with_tampered_token_sets_no_cookie() {
        let (app, state, _tmp) = test_app().await;
        seed_user(&state, "ada@example.com").await;
        let token = login(&app, "ada@example.com").await;
        let tampered = format!("{token}x");

        let (status, headers, _) = send(&app, authed("POST", "/api/v1/logout", &tampered)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(headers.get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_chat_models_are_masked() {
        let (app, state, _tmp) = test_app().await;
        seed_user(&state, "ada@example.com").await;
        let token = login(&app, "ada@example.com").await;

        let (status, _, _) = send(&app, authed("GET", "/api/v1/chat-models/default", &token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        state
            .model_service
            .create_chat_model(&CreateChatModelParams {
                name: "gpt-4o".to_string(),
                label: "GPT-4o".to_string(),
                is_default: true,
                url: "https://api.openai.com/v1/chat/completions".to_string(),
                api_auth_header: "Authorization".to_string(),
                api_auth_key: "sk-live-abcd1234".to_string(),
            })
            .await
            .unwrap();

        let (status, _, body) = send(&app, authed("GET", "/api/v1/chat-models", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["api_auth_key"], "****1234");

        let (status, _, body) = send(&app, authed("GET", "/api/v1/chat-models/default", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "gpt-4o");
    }
}
