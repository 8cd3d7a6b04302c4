//! Error types for remote API operations

/// Errors from Fintopio API calls.
///
/// `Remote` covers both transport failures (no status) and non-2xx
/// responses (status present). `context` is the human-readable phrase for
/// the endpoint, so a bare log line still says which call failed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{context}: {message}")]
    Remote {
        context: &'static str,
        message: String,
        status: Option<u16>,
    },

    #[error("{context}: invalid response: {message}")]
    Parse {
        context: &'static str,
        message: String,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl Error {
    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => *status,
            _ => None,
        }
    }
}

/// Result alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;
