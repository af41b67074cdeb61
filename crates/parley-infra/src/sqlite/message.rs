//! SQLite chat message repository implementation.
//!
//! Implements `ChatMessageRepository` from `parley-core`. Session-scoped reads
//! order by `(created_at, id)`; the `raw` payload is stored as JSON text.

use chrono::Utc;
use parley_core::repository::message::ChatMessageRepository;
use parley_types::chat::{
    ChatMessage, CreateChatMessageParams, MessageRole, UpdateChatMessageByUuidParams,
    UpdateChatMessageParams,
};
use parley_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error, write_error};

/// SQLite-backed implementation of `ChatMessageRepository`.
pub struct SqliteChatMessageRepository {
    pool: DatabasePool,
}

impl SqliteChatMessageRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

struct ChatMessageRow {
    id: i64,
    uuid: String,
    chat_session_uuid: String,
    role: String,
    content: String,
    raw: String,
    token_count: i64,
    is_pin: bool,
    created_at: String,
    updated_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            uuid: row.try_get("uuid")?,
            chat_session_uuid: row.try_get("chat_session_uuid")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            raw: row.try_get("raw")?,
            token_count: row.try_get("token_count")?,
            is_pin: row.try_get("is_pin")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let role: MessageRole = self.role.parse().map_err(RepositoryError::Query)?;
        let raw = serde_json::from_str(&self.raw)
            .map_err(|e| RepositoryError::Query(format!("invalid raw payload: {e}")))?;

        Ok(ChatMessage {
            id: self.id as i32,
            uuid: self.uuid,
            chat_session_uuid: self.chat_session_uuid,
            role,
            content: self.content,
            raw,
            token_count: self.token_count as i32,
            is_pin: self.is_pin,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn map_rows(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<ChatMessage>, RepositoryError> {
    let mut messages = Vec::with_capacity(rows.len());
    for row in rows {
        messages.push(ChatMessageRow::from_row(row).map_err(query_error)?.into_message()?);
    }
    Ok(messages)
}

fn map_optional(
    row: Option<sqlx::sqlite::SqliteRow>,
) -> Result<Option<ChatMessage>, RepositoryError> {
    match row {
        Some(row) => Ok(Some(
            ChatMessageRow::from_row(&row)
                .map_err(query_error)?
                .into_message()?,
        )),
        None => Ok(None),
    }
}

fn encode_raw(raw: &serde_json::Value) -> Result<String, RepositoryError> {
    serde_json::to_string(raw).map_err(|e| RepositoryError::Query(format!("invalid raw payload: {e}")))
}

// ---------------------------------------------------------------------------
// ChatMessageRepository implementation
// ---------------------------------------------------------------------------

impl ChatMessageRepository for SqliteChatMessageRepository {
    async fn create(&self, params: &CreateChatMessageParams) -> Result<ChatMessage, RepositoryError> {
        let now = format_datetime(&Utc::now());
        let row = sqlx::query(
            r#"INSERT INTO chat_message (uuid, chat_session_uuid, role, content, raw, token_count, is_pin, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?)
               RETURNING *"#,
        )
        .bind(&params.uuid)
        .bind(&params.chat_session_uuid)
        .bind(params.role.to_string())
        .bind(&params.content)
        .bind(encode_raw(&params.raw)?)
        .bind(params.token_count)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| write_error(e, || format!("message {} already exists", params.uuid)))?;

        ChatMessageRow::from_row(&row)
            .map_err(query_error)?
            .into_message()
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<ChatMessage>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_message WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        map_optional(row)
    }

    async fn get_by_uuid(&self, uuid: &str) -> Result<Option<ChatMessage>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_message WHERE uuid = ?")
            .bind(uuid)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        map_optional(row)
    }

    async fn update(&self, params: &UpdateChatMessageParams) -> Result<ChatMessage, RepositoryError> {
        let row = sqlx::query(
            r#"UPDATE chat_message
               SET role = ?, content = ?, raw = ?, token_count = ?, is_pin = ?, updated_at = ?
               WHERE id = ?
               RETURNING *"#,
        )
        .bind(params.role.to_string())
        .bind(&params.content)
        .bind(encode_raw(&params.raw)?)
        .bind(params.token_count)
        .bind(params.is_pin)
        .bind(format_datetime(&Utc::now()))
        .bind(params.id)
        .fetch_optional(&self.pool.writer)
        .await
        .map_err(query_error)?;

        map_optional(row)?.ok_or(RepositoryError::NotFound)
    }

    async fn update_by_uuid(
        &self,
        params: &UpdateChatMessageByUuidParams,
    ) -> Result<ChatMessage, RepositoryError> {
        let row = sqlx::query(
            r#"UPDATE chat_message
               SET content = ?, token_count = ?, is_pin = ?, updated_at = ?
               WHERE uuid = ?
               RETURNING *"#,
        )
        .bind(&params.content)
        .bind(params.token_count)
        .bind(params.is_pin)
        .bind(format_datetime(&Utc::now()))
        .bind(&params.uuid)
        .fetch_optional(&self.pool.writer)
        .await
        .map_err(query_error)?;

        map_optional(row)?.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_message WHERE id = ?")
            .bind(id)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_by_uuid(&self, uuid: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_message WHERE uuid = ?")
            .bind(uuid)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_by_session_uuid(&self, session_uuid: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_message WHERE chat_session_uuid = ?")
            .bind(session_uuid)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected())
    }

    async fn list_all(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM chat_message ORDER BY id ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;
        map_rows(&rows)
    }

    async fn list_by_session_uuid(
        &self,
        session_uuid: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM chat_message
               WHERE chat_session_uuid = ?
               ORDER BY created_at ASC, id ASC
               LIMIT ? OFFSET ?"#,
        )
        .bind(session_uuid)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;
        map_rows(&rows)
    }

    async fn latest_by_session_uuid(
        &self,
        session_uuid: &str,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM (
                   SELECT * FROM chat_message
                   WHERE chat_session_uuid = ?
                   ORDER BY created_at DESC, id DESC
                   LIMIT ?
               )
               ORDER BY created_at ASC, id ASC"#,
        )
        .bind(session_uuid)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;
        map_rows(&rows)
    }

    async fn first_by_session_uuid(
        &self,
        session_uuid: &str,
    ) -> Result<Option<ChatMessage>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT * FROM chat_message
               WHERE chat_session_uuid = ?
               ORDER BY created_at ASC, id ASC
               LIMIT 1"#,
        )
        .bind(session_uuid)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;
        map_optional(row)
    }

    async fn last_n_by_session_uuid(
        &self,
        session_uuid: &str,
        n: i64,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM chat_message
               WHERE chat_session_uuid = ?
                 AND (is_pin = 1 OR id IN (
                     SELECT id FROM chat_message
                     WHERE chat_session_uuid = ?
                     ORDER BY created_at DESC, id DESC
                     LIMIT ?
                 ))
               ORDER BY created_at ASC, id ASC"#,
        )
        .bind(session_uuid)
        .bind(session_uuid)
        .bind(n)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;
        map_rows(&rows)
    }

    async fn count_by_user(&self, user_id: i32) -> Result<i64, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT COUNT(*) AS cnt
               FROM chat_message m
               JOIN chat_session s ON s.uuid = m.chat_session_uuid
               WHERE s.user_id = ?"#,
        )
        .bind(user_id)
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_error)?;

        row.try_get("cnt").map_err(query_error)
    }
}
