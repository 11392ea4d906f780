//! Error types for groove-query

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Compilation never fails; errors only come from configuration and
/// caller-supplied JSON fragments.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid compiler configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid raw clause: {0}")]
    InvalidClause(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
