//! History assembly and auth flows against a real SQLite store.

use parley_core::auth::service::AuthUserService;
use parley_core::chat::service::ChatMessageService;
use parley_core::repository::message::ChatMessageRepository;
use parley_core::repository::prompt::ChatPromptRepository;
use parley_types::auth::NewAuthUser;
use parley_types::chat::{CreateChatMessageParams, CreateChatPromptParams, MessageRole};
use parley_types::error::{AuthError, ChatError};
use secrecy::SecretString;

use super::auth_user::SqliteAuthUserRepository;
use super::message::SqliteChatMessageRepository;
use super::prompt::SqliteChatPromptRepository;
use super::test_support::{seed_session, test_pool};
use crate::crypto::password::Argon2PasswordScheme;
use crate::crypto::token::Hs256TokenCodec;

async fn seeded_service(
    prompts: usize,
    messages: usize,
) -> ChatMessageService<SqliteChatMessageRepository, SqliteChatPromptRepository> {
    let pool = test_pool().await;
    seed_session(&pool, "ada@example.com", "s1").await;

    let prompt_repo = SqliteChatPromptRepository::new(pool.clone());
    for i in 0..prompts {
        prompt_repo
            .create(&CreateChatPromptParams {
                chat_session_uuid: "s1".to_string(),
                uuid: format!("p{i}"),
                role: MessageRole::System,
                content: format!("instruction {i}"),
                token_count: 2,
            })
            .await
            .unwrap();
    }

    let message_repo = SqliteChatMessageRepository::new(pool.clone());
    for i in 0..messages {
        message_repo
            .create(&CreateChatMessageParams {
                chat_session_uuid: "s1".to_string(),
                uuid: format!("m{i}"),
                role: if i % 2 == 0 {
                    MessageRole::User
                } else {
                    MessageRole::Assistant
                },
                content: format!("turn {i}"),
                raw: serde_json::Value::Null,
                token_count: 2,
            })
            .await
            .unwrap();
    }

    ChatMessageService::new(message_repo, prompt_repo)
}

#[tokio::test]
async fn history_is_prompts_block_then_message_page() {
    let svc = seeded_service(2, 6).await;

    let history = svc.get_chat_history_by_session("s1", 1, 4).await.unwrap();
    let uuids: Vec<&str> = history.iter().map(|m| m.uuid.as_str()).collect();
    assert_eq!(uuids, vec!["p0", "p1", "m0", "m1", "m2", "m3"]);

    let inversions: Vec<bool> = history.iter().map(|m| m.inversion).collect();
    assert_eq!(inversions, vec![true, false, true, false, true, false]);

    assert!(history[0].date_time.ends_with("AM") || history[0].date_time.ends_with("PM"));
    assert_eq!(history[2].date_time.len(), "2024-01-01 00:00:00".len());
}

#[tokio::test]
async fn history_second_page_overlaps_first() {
    let svc = seeded_service(0, 6).await;

    let page_two = svc.get_chat_history_by_session("s1", 2, 3).await.unwrap();
    let uuids: Vec<&str> = page_two.iter().map(|m| m.uuid.as_str()).collect();
    assert_eq!(uuids, vec!["m1", "m2", "m3"]);
}

#[tokio::test]
async fn history_of_unknown_session_is_empty() {
    let svc = seeded_service(1, 1).await;
    let history = svc.get_chat_history_by_session("nope", 1, 10).await.unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn history_page_size_bounds_messages_only() {
    let svc = seeded_service(3, 10).await;
    let history = svc.get_chat_history_by_session("s1", 1, 5).await.unwrap();
    assert_eq!(history.len(), 3 + 5);
    assert_eq!(history.iter().filter(|m| m.is_prompt).count(), 3);
}

#[tokio::test]
async fn deleting_session_messages_clears_history_page() {
    let svc = seeded_service(1, 3).await;
    assert_eq!(svc.delete_chat_messages_by_session("s1").await.unwrap(), 3);

    let history = svc.get_chat_history_by_session("s1", 1, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(matches!(
        svc.get_first_message_by_session("s1").await,
        Err(ChatError::NotFound(_))
    ));
}

#[tokio::test]
async fn login_logout_round_trip() {
    let pool = test_pool().await;
    let codec =
        Hs256TokenCodec::new(SecretString::from("integration-secret".to_string()), "parley", 600)
            .unwrap();
    let svc = AuthUserService::new(
        SqliteAuthUserRepository::new(pool),
        Argon2PasswordScheme::new(),
        codec,
        false,
    );

    svc.create_auth_user(&NewAuthUser {
        email: "ada@example.com".to_string(),
        password: "analytical engine".to_string(),
        ..Default::default()
    })
    .await
    .unwrap();

    assert!(matches!(
        svc.authenticate("ada@example.com", "difference engine").await,
        Err(AuthError::InvalidCredentials)
    ));

    let user = svc
        .authenticate("ada@example.com", "analytical engine")
        .await
        .unwrap();
    let issued = svc.issue_token(&user).unwrap();
    assert_eq!(svc.verify_token(&issued.token).unwrap().user_id(), Some(user.id));

    let cookie = svc.logout(&issued.token).unwrap();
    assert_eq!(cookie.value, user.id.to_string());
    assert!(matches!(
        svc.verify_token(&issued.token),
        Err(AuthError::TokenInvalid(_))
    ));
}
