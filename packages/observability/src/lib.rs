//! # Observability
//!
//! Structured logging for the Diet Architect crates.
//!
//! Library crates only use `tracing` macros. The binary calls
//! [`init_with_config`] once at startup, which installs a subscriber that
//! writes one JSON object per line to a log file:
//!
//! `~/.diet-architect/logs/app.jsonl`
//!
//! The terminal belongs to the UI, so nothing is written to stderr unless
//! `also_stderr` is set. Follow the log with:
//!
//! - `tail -f ~/.diet-architect/logs/app.jsonl | jq`
//!
//! Field values whose names look like credentials (passwords, tokens, API
//! keys) are replaced with `"[redacted]"` before they reach the file.
//!
//! ## Usage
//!
//! ```rust,ignore
//! fn main() -> std::io::Result<()> {
//!     observability::init_with_config(observability::LogConfig {
//!         service_name: "diet-architect".into(),
//!         default_level: "debug".into(),
//!         ..Default::default()
//!     })?;
//!
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

mod json_layer;
mod redact;
mod sink;

use std::io;
use std::path::PathBuf;

pub use json_layer::{JsonLayer, LogEntry};
pub use redact::{is_sensitive_key, REDACTED};
pub use sink::{default_log_path, JsonlFileWriter, WriterFactory};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service, included in every log line.
    pub service_name: String,

    /// Default log level filter (e.g., "debug", "info", "warn").
    /// Can be overridden by `RUST_LOG` environment variable.
    pub default_level: String,

    /// Optional custom log file path.
    /// Defaults to `~/.diet-architect/logs/app.jsonl`.
    pub log_path: Option<PathBuf>,

    /// Also emit compact logs to stderr.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: false,
        }
    }
}

/// Initialize logging with a custom configuration.
///
/// Returns the path of the log file that was opened. Fails if the file
/// cannot be created or if a global subscriber is already installed.
pub fn init_with_config(config: LogConfig) -> io::Result<PathBuf> {
    sink::install_subscriber(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.service_name, "unknown");
        assert_eq!(config.default_level, "info");
        assert!(config.log_path.is_none());
        assert!(!config.also_stderr);
    }
}
