//! Error types for credential bridge operations

/// Errors from the credential handshake or identity extraction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to launch helper: {0}")]
    Spawn(String),

    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error("handshake timed out after {0}s")]
    Timeout(u64),

    #[error("invalid query credential: {0}")]
    Identity(String),
}

/// Result alias for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;
