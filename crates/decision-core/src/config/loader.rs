//! Settings loading

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, Result};

use super::defaults::{settings_file_names, SETTINGS_SUBDIR};
use super::types::QueueSettings;
use super::validation::validate_settings;

/// Load settings from a file
pub fn load_settings(path: &Path) -> Result<QueueSettings> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading settings");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let settings: QueueSettings = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    validate_settings(&settings)?;
    debug!(path = %path.display(), "settings loaded and validated");
    Ok(settings)
}

/// Find a settings file in a directory or its parents.
///
/// At each directory level the search checks:
///   1. `<dir>/<name>`               (e.g. `decision.toml`)
///   2. `<dir>/.taskcluster/<name>`  (e.g. `.taskcluster/decision.toml`)
///
/// The first match wins. Parents are walked until the filesystem root.
pub fn find_settings(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for settings file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in settings_file_names() {
            let path = current.join(name);
            if path.exists() {
                info!(path = %path.display(), "found settings file");
                return Some(path);
            }

            let nested = current.join(SETTINGS_SUBDIR).join(name);
            if nested.exists() {
                info!(path = %nested.display(), "found settings file in {}/", SETTINGS_SUBDIR);
                return Some(nested);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no settings file found");
    None
}

/// Load settings if a file exists, defaults otherwise.
///
/// A file that exists but does not parse or validate is an error: silently
/// falling back would submit tasks to the wrong place.
pub fn load_settings_or_default(dir: &Path) -> Result<(QueueSettings, Option<PathBuf>)> {
    match find_settings(dir) {
        Some(path) => {
            let settings = load_settings(&path)?;
            Ok((settings, Some(path)))
        }
        None => {
            debug!(dir = %dir.display(), "no settings file, using defaults");
            Ok((QueueSettings::default(), None))
        }
    }
}
