//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;
use std::path::Path;

/// Quote a string as a TOML basic string
fn quoted(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}

fn quoted_path(p: &Path) -> String {
    quoted(&p.display().to_string())
}

impl Config {
    /// Render the config as a commented TOML file
    pub fn to_toml(&self) -> String {
        format!(
            r#"# resume-optimizer configuration

# Generation endpoint. Receives {{"resumeUrl", "jobDescription"}} and answers {{"markdown"}}.
# Env override: RESUME_OPTIMIZER_ENDPOINT
endpoint = {endpoint}

# Where "Download" writes optimized-resume.md
# Env override: RESUME_OPTIMIZER_DOWNLOAD_DIR
download_dir = {download_dir}

# Seconds to wait for the endpoint; 0 waits forever
request_timeout_secs = {timeout}

# Color theme: dark, light
theme = {theme}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level}
# File logging (in addition to the console strip or stderr)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = {log_file_prefix}
"#,
            endpoint = quoted(&self.endpoint),
            download_dir = quoted_path(&self.download_dir),
            timeout = self.request_timeout_secs,
            theme = quoted(&self.theme),
            log_level = quoted(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = quoted_path(&self.logging.file_dir),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = quoted(&self.logging.file_prefix),
        )
    }
}
