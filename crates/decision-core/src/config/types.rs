//! Queue settings types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use decision_queue::HttpQueueConfig;

use crate::error::{ConfigError, Result};

use super::defaults::*;

/// Where and how tasks are submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSettings {
    /// Base URL of the queue API
    pub queue_url: String,

    /// Scheduler that owns the submitted tasks
    pub scheduler_id: String,

    /// Provisioner of the worker pool
    pub provisioner_id: String,

    /// Worker type tasks run on
    pub worker_type: String,

    /// Prefix prepended to every task name in its metadata
    pub name_prefix: String,

    /// Maximum run time of each task, in seconds
    pub max_run_time_secs: u64,

    /// Time between creation and deadline, in seconds
    pub deadline_secs: u64,

    /// Lifetime of published artifacts, in days
    pub artifact_expiry_days: u64,

    /// Per-request timeout for queue calls, in seconds
    pub request_timeout_secs: u64,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            queue_url: decision_queue::DEFAULT_QUEUE_URL.to_string(),
            scheduler_id: DEFAULT_SCHEDULER_ID.to_string(),
            provisioner_id: DEFAULT_PROVISIONER_ID.to_string(),
            worker_type: DEFAULT_WORKER_TYPE.to_string(),
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            max_run_time_secs: DEFAULT_MAX_RUN_TIME_SECS,
            deadline_secs: DEFAULT_DEADLINE_SECS,
            artifact_expiry_days: DEFAULT_ARTIFACT_EXPIRY_DAYS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl QueueSettings {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    pub fn artifact_expiry(&self) -> Result<Duration> {
        self.artifact_expiry_days
            .checked_mul(24 * 60 * 60)
            .map(Duration::from_secs)
            .ok_or_else(|| {
                ConfigError::InvalidValue {
                    field: "artifact_expiry_days".to_string(),
                    message: "too large".to_string(),
                }
                .into()
            })
    }

    /// Client configuration for [`decision_queue::HttpQueue`]
    pub fn http_config(&self) -> HttpQueueConfig {
        HttpQueueConfig {
            base_url: self.queue_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = QueueSettings::default();
        assert_eq!(settings.queue_url, "http://taskcluster/queue/v1/");
        assert_eq!(settings.scheduler_id, "taskcluster-github");
        assert_eq!(settings.provisioner_id, "aws-provisioner-v1");
        assert_eq!(settings.worker_type, "servo-docker-worker");
        assert_eq!(settings.max_run_time_secs, 3600);
        assert_eq!(settings.deadline(), Duration::from_secs(3600));
        assert_eq!(
            settings.artifact_expiry().unwrap(),
            Duration::from_secs(7 * 24 * 3600)
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: QueueSettings = toml::from_str("worker_type = \"big-worker\"").unwrap();
        assert_eq!(settings.worker_type, "big-worker");
        assert_eq!(settings.scheduler_id, DEFAULT_SCHEDULER_ID);
    }

    #[test]
    fn test_artifact_expiry_overflow_is_error() {
        let settings = QueueSettings {
            artifact_expiry_days: 300_000_000_000_000,
            ..QueueSettings::default()
        };
        assert!(matches!(
            settings.artifact_expiry(),
            Err(crate::error::DecisionError::Config(ConfigError::InvalidValue { field, .. }))
                if field == "artifact_expiry_days"
        ));
    }

    #[test]
    fn test_http_config() {
        let settings = QueueSettings {
            request_timeout_secs: 5,
            ..QueueSettings::default()
        };
        let http = settings.http_config();
        assert_eq!(http.base_url, settings.queue_url);
        assert_eq!(http.timeout, Duration::from_secs(5));
    }
}
