//! Error types for groove-client

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Search execution errors
///
/// Missing or malformed aggregations are not errors; they surface as
/// [`SearchResults::schema_warnings`](crate::SearchResults::schema_warnings).
#[derive(Error, Debug)]
pub enum Error {
    #[error("Search backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Search backend rejected query (status {status}): {body}")]
    QueryExecution { status: u16, body: String },

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),

    #[error("Invalid backend configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Classify a failed request: connection and timeout failures mean the
    /// backend is unreachable, anything else is a client-side fault.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::BackendUnavailable(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}
