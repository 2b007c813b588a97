//! Logging initialization.
//!
//! Thin wrapper over the observability crate so the binary only needs the
//! resolved [`Paths`] and a level.

use crate::{CoreError, CoreResult, Paths};
use observability::LogConfig;

/// Service name written into every log line.
pub const SERVICE_NAME: &str = "diet-architect";

/// Initialize structured logging into `<base>/logs/app.jsonl`.
///
/// `RUST_LOG` takes precedence over `level`. Nothing goes to stderr because
/// the terminal is owned by the UI.
pub fn init_logging(level: &str, paths: &Paths) -> CoreResult<()> {
    paths.ensure_dirs()?;

    observability::init_with_config(LogConfig {
        service_name: SERVICE_NAME.to_string(),
        default_level: level.to_string(),
        log_path: Some(paths.log_file()),
        also_stderr: false,
    })
    .map_err(|e| CoreError::Config(format!("failed to initialize logging: {}", e)))?;

    Ok(())
}
