//! Exit codes for the CLI

use decision_core::DecisionError;

/// Success
pub const SUCCESS: i32 = 0;

/// General error, including failed submissions
pub const ERROR: i32 = 1;

/// Configuration error (nothing was submitted)
pub const CONFIG_ERROR: i32 = 2;

/// Exit code for an error returned by the CLI
pub fn for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<DecisionError>() {
        Some(e) if e.is_config() => CONFIG_ERROR,
        _ => ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decision_core::ConfigError;
    use decision_queue::QueueError;

    #[test]
    fn test_config_error_code() {
        let err = anyhow::Error::new(DecisionError::from(ConfigError::MissingVar(
            "TASK_ID".to_string(),
        )));
        assert_eq!(for_error(&err), CONFIG_ERROR);
    }

    #[test]
    fn test_queue_error_code() {
        let err = anyhow::Error::new(DecisionError::from(QueueError::ApiError {
            status: 500,
            message: "boom".to_string(),
        }));
        assert_eq!(for_error(&err), ERROR);
    }

    #[test]
    fn test_other_error_code() {
        assert_eq!(for_error(&anyhow::anyhow!("io failure")), ERROR);
    }
}
