//! Error types for the decision task

use thiserror::Error;

use decision_queue::QueueError;

/// Result type alias using DecisionError
pub type Result<T> = std::result::Result<T, DecisionError>;

/// Main error type for decision task operations
#[derive(Debug, Error)]
pub enum DecisionError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Task graph construction errors
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Submission errors from the queue
    #[error("Failed to submit task: {0}")]
    Queue(#[from] QueueError),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DecisionError {
    /// Whether the error happened before anything was submitted
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is unset
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Required environment variable is set but empty
    #[error("Environment variable {0} is empty")]
    EmptyVar(String),

    /// Invalid settings value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading settings: {0}")]
    Io(#[from] std::io::Error),
}

/// Task graph construction errors
#[derive(Debug, Error)]
pub enum GraphError {
    /// Dependency on an id this run never produced
    #[error("Task '{task}' depends on unknown task id {dependency}")]
    UnknownDependency { task: String, dependency: String },

    /// The id generator handed out an id twice
    #[error("Task id {0} was already used in this run")]
    DuplicateTaskId(String),
}
