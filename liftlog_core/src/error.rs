//! Error types for the liftlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for liftlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A mapped set record failed schema validation at commit time
    #[error("Validation error: {0}")]
    Validation(String),

    /// Workout store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Completing a workout requires an active session
    #[error("no active workout to complete")]
    NoActiveSession,

    /// A commit is already in flight for the active session
    #[error("a workout commit is already in flight")]
    CommitInFlight,

    /// Generic error
    #[error("{0}")]
    Other(String),
}
