use thiserror::Error;

/// Errors from repository operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from message, prompt, and history operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid request: {0}")]
    Validation(String),

    /// A store call failed; `context` names the operation that issued it.
    #[error("{context}: {source}")]
    Storage {
        context: String,
        source: RepositoryError,
    },
}

impl ChatError {
    /// Build a mapper that wraps a repository error with operation context.
    pub fn storage(context: &str) -> impl FnOnce(RepositoryError) -> ChatError + '_ {
        move |source| ChatError::Storage {
            context: context.to_string(),
            source,
        }
    }
}

/// Errors from credential checks and session tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user not found")]
    NotFound,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("email '{0}' is already registered")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from chat model registry operations.
#[derive(Debug, Error)]
pub enum ChatModelError {
    #[error("chat model not found")]
    NotFound,

    #[error("chat model '{0}' already exists")]
    Conflict(String),

    #[error("invalid chat model: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}
