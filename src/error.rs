use thiserror::Error;

/// Failures at the TMDB boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TmdbError {
    /// Connection, DNS, timeout or body read failure.
    #[error("network failure: {0}")]
    Network(String),

    /// Non-2xx response. `message` is TMDB's `status_message` when the body had one.
    #[error("TMDB returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Upstream { status: u16, message: Option<String> },

    /// The payload was not JSON, or not the shape we expected.
    #[error("unexpected TMDB payload: {0}")]
    Mapping(String),
}

impl TmdbError {
    pub fn mapping(msg: impl Into<String>) -> Self {
        Self::Mapping(msg.into())
    }

    /// Message safe to hand back to an API caller.
    pub fn public_message(&self) -> Option<&str> {
        match self {
            TmdbError::Upstream {
                message: Some(m), ..
            } => Some(m.as_str()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TmdbError::Upstream { status: 404, .. })
    }
}

pub type TmdbResult<T> = std::result::Result<T, TmdbError>;

/// Bad caller input, rejected before any network call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Movie ID is required.")]
    MissingMovieId,

    #[error("Movie ID must be a positive integer.")]
    InvalidMovieId,

    #[error("Keyword is required.")]
    MissingKeyword,
}
