//! File system paths used by the application.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Name of the per-user directory under `$HOME`.
const BASE_DIR_NAME: &str = ".diet-architect";
/// Log file name inside the logs directory.
const LOG_FILE_NAME: &str = "app.jsonl";

/// Resolves the locations of the config file and logs.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory (~/.diet-architect)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.diet-architect`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(BASE_DIR_NAME),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory.
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the optional config file path (`<base>/config.json`).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the logs directory (`<base>/logs`).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the JSONL log file (`<base>/logs/app.jsonl`).
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join(LOG_FILE_NAME)
    }

    /// Ensure the base and logs directories exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
