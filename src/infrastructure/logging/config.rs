use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::models::LoggingConfig;

/// Default name of the rolling log file inside `log_dir`.
pub const DEFAULT_LOG_FILE: &str = "reckon.log";

/// Runtime settings for [`super::LoggerImpl`].
///
/// Built from the `logging` section of the loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default level when `RUST_LOG` is not set
    pub level: String,
    pub format: LogFormat,
    /// Write JSON logs here as well; console only when `None`
    pub log_dir: Option<PathBuf>,
    pub file_name: String,
    /// Console output goes to stderr
    pub enable_stdout: bool,
    pub rotation: RotationPolicy,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            log_dir: None,
            file_name: DEFAULT_LOG_FILE.to_string(),
            enable_stdout: true,
            rotation: RotationPolicy::default(),
        }
    }
}

impl From<&LoggingConfig> for LogConfig {
    /// An unrecognised format falls back to pretty; the config loader
    /// rejects those before this point.
    fn from(settings: &LoggingConfig) -> Self {
        Self {
            level: settings.level.clone(),
            format: settings.format.parse().unwrap_or_default(),
            log_dir: settings.log_dir.as_ref().map(PathBuf::from),
            ..Self::default()
        }
    }
}
