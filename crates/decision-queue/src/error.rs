//! Queue error types

use thiserror::Error;

/// Queue-related errors
#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue service answered with a non-success status
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// The submission was refused before reaching the service
    #[error("Task {task_id} rejected: {reason}")]
    Rejected { task_id: String, reason: String },

    /// Queue URL could not be parsed or joined
    #[error("Invalid queue URL: {0}")]
    InvalidUrl(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<url::ParseError> for QueueError {
    fn from(err: url::ParseError) -> Self {
        QueueError::InvalidUrl(err.to_string())
    }
}

/// Result type for queue operations
pub type Result<T> = std::result::Result<T, QueueError>;
