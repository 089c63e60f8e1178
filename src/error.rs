//! Error types for warp-flap

use thiserror::Error;

/// Result type alias for warp-flap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in warp-flap
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A score submission lacked its fid or score
    #[error("Missing Data")]
    MissingData,

    /// Request body was not valid JSON for the expected shape
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Filesystem error from the leaderboard store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Persisted data failed validation
    #[error("Corrupt leaderboard data: {0}")]
    Corrupt(String),

    /// A store lock was poisoned by a panicking writer
    #[error("Leaderboard store unavailable")]
    LockPoisoned,

    /// A blocking store call was cancelled or panicked
    #[error("Background task failed: {0}")]
    Task(String),

    /// Browser fetch to the leaderboard service failed
    #[error("Network error: {0}")]
    Network(String),
}

impl Error {
    /// Whether the caller (not the service) is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::MissingData | Error::MalformedBody(_))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Error::Task(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Error::LockPoisoned
    }
}
