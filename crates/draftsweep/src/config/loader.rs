use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::ConfigError;
use crate::matcher::PatternSet;

/// `<config_dir>/draftsweep/config.json`, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("draftsweep").join("config.json"))
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

/// Loads `path` when given, otherwise the default location when a file exists
/// there, otherwise built-in defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = path {
        return load_config(path);
    }

    match default_config_path() {
        Some(path) if path.is_file() => load_config(path),
        _ => Ok(Config::default()),
    }
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let scan = &config.scan;

    if scan.patterns.is_empty() {
        return Err(ConfigError::Validation {
            message: "At least one body pattern is required".to_string(),
        });
    }

    // Malformed patterns must stop the run before any mailbox access
    PatternSet::compile(&scan.patterns)?;

    if scan.reply_marker.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "replyMarker must not be empty".to_string(),
        });
    }

    if scan.folder.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "folder must not be empty".to_string(),
        });
    }

    if let Some(imap) = &config.imap {
        if imap.host.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "imap.host must not be empty".to_string(),
            });
        }
        if imap.username.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "imap.username must not be empty".to_string(),
            });
        }
        if imap.port == 0 {
            return Err(ConfigError::Validation {
                message: "imap.port must be non-zero".to_string(),
            });
        }
    }

    Ok(())
}
