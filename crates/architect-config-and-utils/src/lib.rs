//! Configuration, file system paths, and logging setup for Diet Architect.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{
    Config, DEFAULT_GEMINI_MODEL, DEFAULT_LOG_LEVEL, DEFAULT_PASSWORD_REDIRECT_DELAY_MS,
    DEFAULT_SUPABASE_ANON_KEY, DEFAULT_SUPABASE_URL,
};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, SERVICE_NAME};
pub use paths::Paths;
