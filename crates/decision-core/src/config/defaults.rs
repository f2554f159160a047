//! Default settings values

/// Default settings file name (TOML)
pub const DEFAULT_SETTINGS_TOML: &str = "decision.toml";

/// Default settings file name (YAML)
pub const DEFAULT_SETTINGS_YAML: &str = "decision.yaml";

/// Directory also searched for settings at each level
pub const SETTINGS_SUBDIR: &str = ".taskcluster";

pub const DEFAULT_SCHEDULER_ID: &str = "taskcluster-github";
pub const DEFAULT_PROVISIONER_ID: &str = "aws-provisioner-v1";
pub const DEFAULT_WORKER_TYPE: &str = "servo-docker-worker";
pub const DEFAULT_NAME_PREFIX: &str = "Taskcluster experiments for Servo: ";

/// One hour
pub const DEFAULT_MAX_RUN_TIME_SECS: u64 = 3600;

/// One hour
pub const DEFAULT_DEADLINE_SECS: u64 = 3600;

/// One week
pub const DEFAULT_ARTIFACT_EXPIRY_DAYS: u64 = 7;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// The queue refuses deadlines more than five days after creation
pub const MAX_DEADLINE_SECS: u64 = 5 * 24 * 60 * 60;

/// A task cannot run past its deadline
pub const MAX_RUN_TIME_SECS: u64 = MAX_DEADLINE_SECS;

/// Ten years
pub const MAX_ARTIFACT_EXPIRY_DAYS: u64 = 3650;

pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 3600;

/// Get list of settings file names to search for
pub fn settings_file_names() -> Vec<&'static str> {
    vec![DEFAULT_SETTINGS_TOML, DEFAULT_SETTINGS_YAML, "decision.yml"]
}
