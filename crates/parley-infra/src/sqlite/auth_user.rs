//! SQLite auth user repository implementation.

use chrono::Utc;
use parley_core::repository::auth_user::AuthUserRepository;
use parley_types::auth::{AuthUser, CreateAuthUserParams, UpdateAuthUserParams};
use parley_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error, write_error};

/// SQLite-backed implementation of `AuthUserRepository`.
pub struct SqliteAuthUserRepository {
    pool: DatabasePool,
}

impl SqliteAuthUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct AuthUserRow {
    id: i64,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    username: String,
    is_superuser: bool,
    is_active: bool,
    is_staff: bool,
    date_joined: String,
    last_login: Option<String>,
}

impl AuthUserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            username: row.try_get("username")?,
            is_superuser: row.try_get("is_superuser")?,
            is_active: row.try_get("is_active")?,
            is_staff: row.try_get("is_staff")?,
            date_joined: row.try_get("date_joined")?,
            last_login: row.try_get("last_login")?,
        })
    }

    fn into_user(self) -> Result<AuthUser, RepositoryError> {
        Ok(AuthUser {
            id: self.id as i32,
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            username: self.username,
            is_superuser: self.is_superuser,
            is_active: self.is_active,
            is_staff: self.is_staff,
            date_joined: parse_datetime(&self.date_joined)?,
            last_login: self.last_login.as_deref().map(parse_datetime).transpose()?,
        })
    }
}

fn map_optional(row: Option<sqlx::sqlite::SqliteRow>) -> Result<Option<AuthUser>, RepositoryError> {
    row.map(|row| AuthUserRow::from_row(&row).map_err(query_error)?.into_user())
        .transpose()
}

impl AuthUserRepository for SqliteAuthUserRepository {
    async fn create(&self, params: &CreateAuthUserParams) -> Result<AuthUser, RepositoryError> {
        let row = sqlx::query(
            r#"INSERT INTO auth_user (email, password, first_name, last_name, username, is_superuser, is_active, is_staff, date_joined)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#,
        )
        .bind(&params.email)
        .bind(&params.password_hash)
        .bind(&params.first_name)
        .bind(&params.last_name)
        .bind(&params.username)
        .bind(params.is_superuser)
        .bind(params.is_active)
        .bind(params.is_staff)
        .bind(format_datetime(&Utc::now()))
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| write_error(e, || format!("email {} already registered", params.email)))?;

        AuthUserRow::from_row(&row).map_err(query_error)?.into_user()
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<AuthUser>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM auth_user WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        map_optional(row)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<AuthUser>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM auth_user WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        map_optional(row)
    }

    async fn update(&self, params: &UpdateAuthUserParams) -> Result<AuthUser, RepositoryError> {
        let row = sqlx::query(
            r#"UPDATE auth_user
               SET email = ?, first_name = ?, last_name = ?
               WHERE id = ?
               RETURNING *"#,
        )
        .bind(&params.email)
        .bind(&params.first_name)
        .bind(&params.last_name)
        .bind(params.id)
        .fetch_optional(&self.pool.writer)
        .await
        .map_err(|e| write_error(e, || format!("email {} already registered", params.email)))?;

        map_optional(row)?.ok_or(RepositoryError::NotFound)
    }

    async fn list_all(&self) -> Result<Vec<AuthUser>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM auth_user ORDER BY id ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let mut users = Vec::with_capacity(rows.len());
        for row in &rows {
            users.push(AuthUserRow::from_row(row).map_err(query_error)?.into_user()?);
        }
        Ok(users)
    }
}
