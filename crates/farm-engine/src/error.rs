//! Error types for the farming engine

/// Errors from farming iterations and the account store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] fintopio_api::Error),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("account store parse error: {0}")]
    Parse(String),

    #[error("account already enrolled: {0}")]
    DuplicateAccount(String),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
