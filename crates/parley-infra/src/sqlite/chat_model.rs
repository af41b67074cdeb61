//! SQLite chat model registry implementation.
//!
//! Writes that set `is_default` clear the flag on every other row inside the
//! same transaction, so at most one default exists at any commit point.

use parley_core::repository::chat_model::ChatModelRepository;
use parley_types::error::RepositoryError;
use parley_types::model::{ChatModel, CreateChatModelParams, UpdateChatModelParams};
use sqlx::Row;
use tracing::debug;

use super::pool::DatabasePool;
use super::{query_error, write_error};

/// SQLite-backed implementation of `ChatModelRepository`.
pub struct SqliteChatModelRepository {
    pool: DatabasePool,
}

impl SqliteChatModelRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn model_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ChatModel, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(query_error)?;
    Ok(ChatModel {
        id: id as i32,
        name: row.try_get("name").map_err(query_error)?,
        label: row.try_get("label").map_err(query_error)?,
        is_default: row.try_get("is_default").map_err(query_error)?,
        url: row.try_get("url").map_err(query_error)?,
        api_auth_header: row.try_get("api_auth_header").map_err(query_error)?,
        api_auth_key: row.try_get("api_auth_key").map_err(query_error)?,
    })
}

fn map_optional(row: Option<sqlx::sqlite::SqliteRow>) -> Result<Option<ChatModel>, RepositoryError> {
    row.as_ref().map(model_from_row).transpose()
}

impl ChatModelRepository for SqliteChatModelRepository {
    async fn create(&self, params: &CreateChatModelParams) -> Result<ChatModel, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        if params.is_default {
            sqlx::query("UPDATE chat_model SET is_default = 0 WHERE is_default = 1")
                .execute(&mut *tx)
                .await
                .map_err(query_error)?;
        }

        let row = sqlx::query(
            r#"INSERT INTO chat_model (name, label, is_default, url, api_auth_header, api_auth_key)
               VALUES (?, ?, ?, ?, ?, ?)
               RETURNING *"#,
        )
        .bind(&params.name)
        .bind(&params.label)
        .bind(params.is_default)
        .bind(&params.url)
        .bind(&params.api_auth_header)
        .bind(&params.api_auth_key)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, || format!("chat model {} already exists", params.name)))?;

        let model = model_from_row(&row)?;
        tx.commit().await.map_err(query_error)?;

        debug!(id = model.id, name = %model.name, "Chat model stored");
        Ok(model)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<ChatModel>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_model WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        map_optional(row)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<ChatModel>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_model WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        map_optional(row)
    }

    async fn update(&self, params: &UpdateChatModelParams) -> Result<ChatModel, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        if params.is_default {
            sqlx::query("UPDATE chat_model SET is_default = 0 WHERE is_default = 1 AND id != ?")
                .bind(params.id)
                .execute(&mut *tx)
                .await
                .map_err(query_error)?;
        }

        let row = sqlx::query(
            r#"UPDATE chat_model
               SET name = ?, label = ?, is_default = ?, url = ?, api_auth_header = ?, api_auth_key = ?
               WHERE id = ?
               RETURNING *"#,
        )
        .bind(&params.name)
        .bind(&params.label)
        .bind(params.is_default)
        .bind(&params.url)
        .bind(&params.api_auth_header)
        .bind(&params.api_auth_key)
        .bind(params.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| write_error(e, || format!("chat model {} already exists", params.name)))?;

        // Dropping the transaction rolls back the cleared flags.
        let model = map_optional(row)?.ok_or(RepositoryError::NotFound)?;
        tx.commit().await.map_err(query_error)?;
        Ok(model)
    }

    async fn update_key(&self, id: i32, api_auth_key: &str) -> Result<ChatModel, RepositoryError> {
        let row = sqlx::query("UPDATE chat_model SET api_auth_key = ? WHERE id = ? RETURNING *")
            .bind(api_auth_key)
            .bind(id)
            .fetch_optional(&self.pool.writer)
            .await
            .map_err(query_error)?;
        map_optional(row)?.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_model WHERE id = ?")
            .bind(id)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ChatModel>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM chat_model ORDER BY id ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;
        rows.iter().map(model_from_row).collect()
    }

    async fn get_default(&self) -> Result<Option<ChatModel>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_model WHERE is_default = 1 ORDER BY id ASC LIMIT 1")
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        map_optional(row)
    }
}
