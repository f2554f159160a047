//! Ambient configuration provided by the CI environment
//!
//! The GitHub integration starts the decision task with the event details in
//! its environment. They are read once, up front, so a missing variable fails
//! the run before anything is submitted.

use tracing::debug;

use decision_queue::TaskId;

use crate::error::{ConfigError, Result};

/// Id of the running decision task (the run root)
pub const TASK_ID_VAR: &str = "TASK_ID";

/// Repository clone URL
pub const CLONE_URL_VAR: &str = "GITHUB_EVENT_CLONE_URL";

/// Commit to build
pub const COMMIT_SHA_VAR: &str = "GITHUB_EVENT_COMMIT_SHA";

/// Person who triggered the event
pub const OWNER_VAR: &str = "GITHUB_EVENT_OWNER";

/// Link back to the triggering event
pub const SOURCE_VAR: &str = "GITHUB_EVENT_SOURCE";

/// Variables every task gets in its environment unless it sets them itself
pub const FORWARDED_VARS: [&str; 2] = [CLONE_URL_VAR, COMMIT_SHA_VAR];

/// Event details the decision task runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbientConfig {
    /// Root of the run; every task depends on it and it is the task group
    pub decision_task_id: TaskId,
    pub clone_url: String,
    pub commit_sha: String,
    pub owner: String,
    pub source: String,
}

impl AmbientConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            match lookup(key) {
                None => Err(ConfigError::MissingVar(key.to_string()).into()),
                Some(value) if value.trim().is_empty() => {
                    Err(ConfigError::EmptyVar(key.to_string()).into())
                }
                Some(value) => Ok(value),
            }
        };

        let config = Self {
            decision_task_id: TaskId::new(require(TASK_ID_VAR)?),
            clone_url: require(CLONE_URL_VAR)?,
            commit_sha: require(COMMIT_SHA_VAR)?,
            owner: require(OWNER_VAR)?,
            source: require(SOURCE_VAR)?,
        };

        debug!(
            decision_task_id = %config.decision_task_id,
            commit = %config.commit_sha,
            "ambient configuration loaded"
        );
        Ok(config)
    }

    /// Values forwarded into every task's environment
    pub fn forwarded_env(&self) -> [(&'static str, &str); 2] {
        [
            (CLONE_URL_VAR, self.clone_url.as_str()),
            (COMMIT_SHA_VAR, self.commit_sha.as_str()),
        ]
    }
}
