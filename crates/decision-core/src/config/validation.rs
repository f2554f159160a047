//! Settings validation

use tracing::debug;
use url::Url;

use crate::error::{ConfigError, Result};

use super::defaults::{
    MAX_ARTIFACT_EXPIRY_DAYS, MAX_DEADLINE_SECS, MAX_REQUEST_TIMEOUT_SECS, MAX_RUN_TIME_SECS,
};
use super::types::QueueSettings;

/// Validate queue settings
pub fn validate_settings(settings: &QueueSettings) -> Result<()> {
    debug!("validating settings");
    validate_queue_url(settings)?;
    validate_ids(settings)?;
    validate_limits(settings)?;
    debug!("settings validation passed");
    Ok(())
}

fn validate_queue_url(settings: &QueueSettings) -> Result<()> {
    let url = Url::parse(&settings.queue_url).map_err(|e| ConfigError::InvalidValue {
        field: "queue_url".to_string(),
        message: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            field: "queue_url".to_string(),
            message: format!("unsupported scheme '{}'", url.scheme()),
        }
        .into());
    }

    Ok(())
}

fn validate_ids(settings: &QueueSettings) -> Result<()> {
    let fields = [
        ("scheduler_id", &settings.scheduler_id),
        ("provisioner_id", &settings.provisioner_id),
        ("worker_type", &settings.worker_type),
    ];

    for (field, value) in fields {
        if value.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                message: "cannot be empty".to_string(),
            }
            .into());
        }
    }

    Ok(())
}

fn validate_limits(settings: &QueueSettings) -> Result<()> {
    let limits = [
        ("max_run_time_secs", settings.max_run_time_secs, MAX_RUN_TIME_SECS),
        ("deadline_secs", settings.deadline_secs, MAX_DEADLINE_SECS),
        ("artifact_expiry_days", settings.artifact_expiry_days, MAX_ARTIFACT_EXPIRY_DAYS),
        ("request_timeout_secs", settings.request_timeout_secs, MAX_REQUEST_TIMEOUT_SECS),
    ];

    for (field, value, max) in limits {
        if value == 0 {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                message: "must be greater than zero".to_string(),
            }
            .into());
        }
        if value > max {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                message: format!("must be at most {}", max),
            }
            .into());
        }
    }

    Ok(())
}
