//! `[logging]` section
//!
//! Deserialized straight from the config file; missing keys take the
//! defaults below.

use serde::Deserialize;
use std::path::PathBuf;

/// How often the JSON log file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl From<String> for LogRotation {
    /// Unknown values fall back to daily instead of failing the whole file
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "never" => Self::Never,
            _ => Self::Daily,
        }
    }
}

impl LogRotation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for this crate's events when RUST_LOG is unset
    pub level: String,
    /// Also write JSON lines to `file_dir`
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: default_log_dir(),
            file_rotation: LogRotation::Daily,
            file_prefix: "resume-optimizer".to_string(),
        }
    }
}

/// Per-user data dir, so logs don't land wherever the binary was started
fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("resume-optimizer").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
