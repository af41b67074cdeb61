//! Chat session repository trait definition.
//!
//! Only what message and prompt storage needs: sessions must exist before
//! anything can reference them.

use parley_types::chat::{ChatSession, CreateChatSessionParams};
use parley_types::error::RepositoryError;

pub trait ChatSessionRepository: Send + Sync {
    fn create(
        &self,
        params: &CreateChatSessionParams,
    ) -> impl std::future::Future<Output = Result<ChatSession, RepositoryError>> + Send;

    fn get_by_uuid(
        &self,
        uuid: &str,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send;
}
