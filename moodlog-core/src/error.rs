//! Error types for moodlog-core

use thiserror::Error;

/// Main error type for the moodlog-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Entry rejected before it reached the store
    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    /// Entry not found
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    /// Plan limit on entries per month exhausted
    #[error("entry limit reached: {used} of {limit} entries used this month")]
    EntryLimitReached { limit: u32, used: u32 },

    /// Emotion classifier failure
    #[error("classifier error: {0}")]
    Classifier(String),
}

/// Result type alias for moodlog-core
pub type Result<T> = std::result::Result<T, Error>;
