//! Chat model registry repository trait definition.

use parley_types::error::RepositoryError;
use parley_types::model::{ChatModel, CreateChatModelParams, UpdateChatModelParams};

/// Repository trait for chat model records.
///
/// Implementations keep at most one row flagged `is_default`: storing a row
/// with the flag set clears it everywhere else in the same transaction.
pub trait ChatModelRepository: Send + Sync {
    fn create(
        &self,
        params: &CreateChatModelParams,
    ) -> impl std::future::Future<Output = Result<ChatModel, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: i32,
    ) -> impl std::future::Future<Output = Result<Option<ChatModel>, RepositoryError>> + Send;

    fn get_by_name(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<ChatModel>, RepositoryError>> + Send;

    fn update(
        &self,
        params: &UpdateChatModelParams,
    ) -> impl std::future::Future<Output = Result<ChatModel, RepositoryError>> + Send;

    /// Replace only the auth key.
    fn update_key(
        &self,
        id: i32,
        api_auth_key: &str,
    ) -> impl std::future::Future<Output = Result<ChatModel, RepositoryError>> + Send;

    fn delete(
        &self,
        id: i32,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All models, ordered by id.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ChatModel>, RepositoryError>> + Send;

    fn get_default(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<ChatModel>, RepositoryError>> + Send;
}
