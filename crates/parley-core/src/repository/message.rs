//! Chat message repository trait definition.

use parley_types::chat::{
    ChatMessage, CreateChatMessageParams, UpdateChatMessageByUuidParams, UpdateChatMessageParams,
};
use parley_types::error::RepositoryError;

/// Repository trait for chat message persistence.
///
/// Implementations live in parley-infra (e.g., `SqliteChatMessageRepository`).
/// Session-scoped reads return rows in natural order: `created_at` ascending,
/// ties broken by `id`.
pub trait ChatMessageRepository: Send + Sync {
    /// Insert a message. Returns the stored row.
    fn create(
        &self,
        params: &CreateChatMessageParams,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// Get a message by numeric id.
    fn get_by_id(
        &self,
        id: i32,
    ) -> impl std::future::Future<Output = Result<Option<ChatMessage>, RepositoryError>> + Send;

    /// Get a message by UUID.
    fn get_by_uuid(
        &self,
        uuid: &str,
    ) -> impl std::future::Future<Output = Result<Option<ChatMessage>, RepositoryError>> + Send;

    /// Replace role, content, raw payload, token count, and pin flag.
    ///
    /// Returns `RepositoryError::NotFound` when no row has the id.
    fn update(
        &self,
        params: &UpdateChatMessageParams,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// Update content, token count, and pin flag of the message with the UUID.
    fn update_by_uuid(
        &self,
        params: &UpdateChatMessageByUuidParams,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// Delete a message by id.
    fn delete(
        &self,
        id: i32,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a message by UUID.
    fn delete_by_uuid(
        &self,
        uuid: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete every message of a session. Returns the number of rows removed.
    fn delete_by_session_uuid(
        &self,
        session_uuid: &str,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// All messages, ordered by id.
    fn list_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// A window of a session's messages: skip `offset` rows, take `limit`.
    fn list_by_session_uuid(
        &self,
        session_uuid: &str,
        offset: i64,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// The `limit` most recent messages of a session, oldest first.
    fn latest_by_session_uuid(
        &self,
        session_uuid: &str,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// The earliest message of a session.
    fn first_by_session_uuid(
        &self,
        session_uuid: &str,
    ) -> impl std::future::Future<Output = Result<Option<ChatMessage>, RepositoryError>> + Send;

    /// The `n` most recent messages plus every pinned message, oldest first.
    fn last_n_by_session_uuid(
        &self,
        session_uuid: &str,
        n: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Number of messages authored under a user's sessions.
    fn count_by_user(
        &self,
        user_id: i32,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;
}
