//! SQLite chat session repository.

use chrono::Utc;
use parley_core::repository::session::ChatSessionRepository;
use parley_types::chat::{ChatSession, CreateChatSessionParams};
use parley_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error, write_error};

pub struct SqliteChatSessionRepository {
    pool: DatabasePool,
}

impl SqliteChatSessionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ChatSessionRow {
    id: i64,
    uuid: String,
    user_id: i64,
    topic: String,
    created_at: String,
    updated_at: String,
}

impl ChatSessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            uuid: row.try_get("uuid")?,
            user_id: row.try_get("user_id")?,
            topic: row.try_get("topic")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_session(self) -> Result<ChatSession, RepositoryError> {
        Ok(ChatSession {
            id: self.id as i32,
            uuid: self.uuid,
            user_id: self.user_id as i32,
            topic: self.topic,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

impl ChatSessionRepository for SqliteChatSessionRepository {
    async fn create(&self, params: &CreateChatSessionParams) -> Result<ChatSession, RepositoryError> {
        let now = format_datetime(&Utc::now());
        let row = sqlx::query(
            r#"INSERT INTO chat_session (uuid, user_id, topic, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)
               RETURNING *"#,
        )
        .bind(&params.uuid)
        .bind(params.user_id)
        .bind(&params.topic)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| write_error(e, || format!("session {} already exists", params.uuid)))?;

        ChatSessionRow::from_row(&row)
            .map_err(query_error)?
            .into_session()
    }

    async fn get_by_uuid(&self, uuid: &str) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_session WHERE uuid = ?")
            .bind(uuid)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(
                ChatSessionRow::from_row(&row)
                    .map_err(query_error)?
                    .into_session()?,
            )),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::{seed_session, test_pool};

    #[tokio::test]
    async fn test_create_and_get_session() {
        let pool = test_pool().await;
        let user_id = seed_session(&pool, "ada@example.com", "s-1").await;

        let repo = SqliteChatSessionRepository::new(pool);
        let session = repo.get_by_uuid("s-1").await.unwrap().unwrap();
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.topic, "test");
        assert!(repo.get_by_uuid("s-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_session_uuid_conflicts() {
        let pool = test_pool().await;
        let user_id = seed_session(&pool, "ada@example.com", "s-1").await;

        let repo = SqliteChatSessionRepository::new(pool);
        let err = repo
            .create(&CreateChatSessionParams {
                uuid: "s-1".to_string(),
                user_id,
                topic: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_session_requires_existing_user() {
        let pool = test_pool().await;
        let repo = SqliteChatSessionRepository::new(pool);
        let err = repo
            .create(&CreateChatSessionParams {
                uuid: "orphan".to_string(),
                user_id: 404,
                topic: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
    }
}
