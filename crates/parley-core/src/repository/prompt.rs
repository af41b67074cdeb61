//! Chat prompt repository trait definition.

use parley_types::chat::{ChatPrompt, CreateChatPromptParams, UpdateChatPromptByUuidParams};
use parley_types::error::RepositoryError;

/// Repository trait for chat prompt persistence.
pub trait ChatPromptRepository: Send + Sync {
    /// Insert a prompt. Returns the stored row.
    fn create(
        &self,
        params: &CreateChatPromptParams,
    ) -> impl std::future::Future<Output = Result<ChatPrompt, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: i32,
    ) -> impl std::future::Future<Output = Result<Option<ChatPrompt>, RepositoryError>> + Send;

    fn get_by_uuid(
        &self,
        uuid: &str,
    ) -> impl std::future::Future<Output = Result<Option<ChatPrompt>, RepositoryError>> + Send;

    /// Update content and token count. `RepositoryError::NotFound` if absent.
    fn update_by_uuid(
        &self,
        params: &UpdateChatPromptByUuidParams,
    ) -> impl std::future::Future<Output = Result<ChatPrompt, RepositoryError>> + Send;

    fn delete_by_uuid(
        &self,
        uuid: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Every prompt of a session in natural order (`created_at`, then `id`).
    fn list_by_session_uuid(
        &self,
        session_uuid: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatPrompt>, RepositoryError>> + Send;

    fn list_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ChatPrompt>, RepositoryError>> + Send;
}
