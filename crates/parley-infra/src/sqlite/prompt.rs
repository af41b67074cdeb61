//! SQLite chat prompt repository implementation.

use chrono::Utc;
use parley_core::repository::prompt::ChatPromptRepository;
use parley_types::chat::{
    ChatPrompt, CreateChatPromptParams, MessageRole, UpdateChatPromptByUuidParams,
};
use parley_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error, write_error};

/// SQLite-backed implementation of `ChatPromptRepository`.
pub struct SqliteChatPromptRepository {
    pool: DatabasePool,
}

impl SqliteChatPromptRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ChatPromptRow {
    id: i64,
    uuid: String,
    chat_session_uuid: String,
    role: String,
    content: String,
    token_count: i64,
    created_at: String,
    updated_at: String,
}

impl ChatPromptRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            uuid: row.try_get("uuid")?,
            chat_session_uuid: row.try_get("chat_session_uuid")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            token_count: row.try_get("token_count")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_prompt(self) -> Result<ChatPrompt, RepositoryError> {
        let role: MessageRole = self.role.parse().map_err(RepositoryError::Query)?;
        Ok(ChatPrompt {
            id: self.id as i32,
            uuid: self.uuid,
            chat_session_uuid: self.chat_session_uuid,
            role,
            content: self.content,
            token_count: self.token_count as i32,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn map_rows(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<ChatPrompt>, RepositoryError> {
    let mut prompts = Vec::with_capacity(rows.len());
    for row in rows {
        prompts.push(ChatPromptRow::from_row(row).map_err(query_error)?.into_prompt()?);
    }
    Ok(prompts)
}

fn map_optional(row: Option<sqlx::sqlite::SqliteRow>) -> Result<Option<ChatPrompt>, RepositoryError> {
    row.map(|row| ChatPromptRow::from_row(&row).map_err(query_error)?.into_prompt())
        .transpose()
}

impl ChatPromptRepository for SqliteChatPromptRepository {
    async fn create(&self, params: &CreateChatPromptParams) -> Result<ChatPrompt, RepositoryError> {
        let now = format_datetime(&Utc::now());
        let row = sqlx::query(
            r#"INSERT INTO chat_prompt (uuid, chat_session_uuid, role, content, token_count, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#,
        )
        .bind(&params.uuid)
        .bind(&params.chat_session_uuid)
        .bind(params.role.to_string())
        .bind(&params.content)
        .bind(params.token_count)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| write_error(e, || format!("prompt {} already exists", params.uuid)))?;

        ChatPromptRow::from_row(&row)
            .map_err(query_error)?
            .into_prompt()
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<ChatPrompt>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_prompt WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        map_optional(row)
    }

    async fn get_by_uuid(&self, uuid: &str) -> Result<Option<ChatPrompt>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_prompt WHERE uuid = ?")
            .bind(uuid)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        map_optional(row)
    }

    async fn update_by_uuid(
        &self,
        params: &UpdateChatPromptByUuidParams,
    ) -> Result<ChatPrompt, RepositoryError> {
        let row = sqlx::query(
            r#"UPDATE chat_prompt
               SET content = ?, token_count = ?, updated_at = ?
               WHERE uuid = ?
               RETURNING *"#,
        )
        .bind(&params.content)
        .bind(params.token_count)
        .bind(format_datetime(&Utc::now()))
        .bind(&params.uuid)
        .fetch_optional(&self.pool.writer)
        .await
        .map_err(query_error)?;

        map_optional(row)?.ok_or(RepositoryError::NotFound)
    }

    async fn delete_by_uuid(&self, uuid: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_prompt WHERE uuid = ?")
            .bind(uuid)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_by_session_uuid(&self, session_uuid: &str) -> Result<Vec<ChatPrompt>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_prompt WHERE chat_session_uuid = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(session_uuid)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;
        map_rows(&rows)
    }

    async fn list_all(&self) -> Result<Vec<ChatPrompt>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM chat_prompt ORDER BY id ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;
        map_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::{seed_session, test_pool};

    fn params(uuid: &str) -> CreateChatPromptParams {
        CreateChatPromptParams {
            chat_session_uuid: "s1".to_string(),
            uuid: uuid.to_string(),
            role: MessageRole::System,
            content: format!("instruction {uuid}"),
            token_count: 3,
        }
    }

    async fn repo() -> SqliteChatPromptRepository {
        let pool = test_pool().await;
        seed_session(&pool, "ada@example.com", "s1").await;
        SqliteChatPromptRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_list_in_insertion_order() {
        let repo = repo().await;
        for uuid in ["p0", "p1", "p2"] {
            repo.create(&params(uuid)).await.unwrap();
        }

        let prompts = repo.list_by_session_uuid("s1").await.unwrap();
        let uuids: Vec<&str> = prompts.iter().map(|p| p.uuid.as_str()).collect();
        assert_eq!(uuids, vec!["p0", "p1", "p2"]);
        assert!(repo.list_by_session_uuid("other").await.unwrap().is_empty());
        assert_eq!(repo.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_and_delete_by_uuid() {
        let repo = repo().await;
        let created = repo.create(&params("p0")).await.unwrap();

        let updated = repo
            .update_by_uuid(&UpdateChatPromptByUuidParams {
                uuid: "p0".to_string(),
                content: "Be brief.".to_string(),
                token_count: 2,
            })
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.content, "Be brief.");

        repo.delete_by_uuid("p0").await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete_by_uuid("p0").await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_prompt_conflicts() {
        let repo = repo().await;
        repo.create(&params("p0")).await.unwrap();
        assert!(matches!(
            repo.create(&params("p0")).await,
            Err(RepositoryError::Conflict(_))
        ));
    }
}
