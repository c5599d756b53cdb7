//! Runtime configuration read from the environment.
//!
//! # Responsibility
//! - Collect database path and logging settings in one typed value.
//! - Keep environment access behind an injectable lookup for tests.
//!
//! # Invariants
//! - Blank variables count as unset.
//! - A present log level must parse; an unparsable one is an error, not a fallback.

use crate::logging::{LogLevel, LoggingError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "STAFFROLL_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "STAFFROLL_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "STAFFROLL_LOG_DIR";

/// Core runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// SQLite file; `None` means callers decide (usually in-memory).
    pub database_path: Option<PathBuf>,
    /// Normalized level name (`trace`..`error`).
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            log_level: LogLevel::build_default().as_str().to_string(),
            log_dir: None,
        }
    }
}

/// Configuration load failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(LoggingError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(err) => write!(f, "{ENV_LOG_LEVEL}: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLogLevel(err) => Some(err),
        }
    }
}

impl CoreConfig {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let level = match read(ENV_LOG_LEVEL) {
            Some(value) => LogLevel::parse(&value).map_err(ConfigError::InvalidLogLevel)?,
            None => LogLevel::build_default(),
        };

        Ok(Self {
            database_path: read(ENV_DB_PATH).map(PathBuf::from),
            log_level: level.as_str().to_string(),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        })
    }
}
