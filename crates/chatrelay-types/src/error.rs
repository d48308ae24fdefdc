use thiserror::Error;

/// Errors from repository operations (used by trait definitions in chatrelay-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors returned by the message-handling service.
///
/// `Validation` is an expected, caller-facing outcome; everything else is an
/// internal failure the HTTP layer hides behind a generic message.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
