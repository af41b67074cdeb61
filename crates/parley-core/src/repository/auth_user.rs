//! Auth user repository trait definition.

use parley_types::auth::{AuthUser, CreateAuthUserParams, UpdateAuthUserParams};
use parley_types::error::RepositoryError;

/// Repository trait for user records.
///
/// There is deliberately no delete: users are only created and updated.
pub trait AuthUserRepository: Send + Sync {
    /// Insert a user. `RepositoryError::Conflict` when the email is taken.
    fn create(
        &self,
        params: &CreateAuthUserParams,
    ) -> impl std::future::Future<Output = Result<AuthUser, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: i32,
    ) -> impl std::future::Future<Output = Result<Option<AuthUser>, RepositoryError>> + Send;

    fn get_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<AuthUser>, RepositoryError>> + Send;

    fn update(
        &self,
        params: &UpdateAuthUserParams,
    ) -> impl std::future::Future<Output = Result<AuthUser, RepositoryError>> + Send;

    /// All users, ordered by id.
    fn list_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<AuthUser>, RepositoryError>> + Send;
}
