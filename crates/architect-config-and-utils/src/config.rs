//! Application configuration.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults (Supabase endpoint and key may be baked in at
//!    compile time).
//! 2. `<base>/config.json`, for the non-secret tunables only.
//! 3. Environment variables (a `.env` file is loaded by the binary first).
//!
//! The configuration is read once at start-up and never written back.

use crate::{CoreError, CoreResult, Paths};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default Supabase URL (can be overridden at compile time via SUPABASE_URL env var).
pub const DEFAULT_SUPABASE_URL: &str = match option_env!("SUPABASE_URL") {
    Some(url) => url,
    None => "https://project-ref.supabase.co",
};

/// Default Supabase anon key (can be overridden at compile time via SUPABASE_ANON_KEY env var).
pub const DEFAULT_SUPABASE_ANON_KEY: &str = match option_env!("SUPABASE_ANON_KEY") {
    Some(key) => key,
    None => "public-anon-key",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default generation model identifier.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default delay before leaving the update-password screen after success.
pub const DEFAULT_PASSWORD_REDIRECT_DELAY_MS: u64 = 2500;

const ENV_LOG_LEVEL: &str = "DIET_ARCHITECT_LOG_LEVEL";
const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
const ENV_GEMINI_API_KEY_FALLBACK: &str = "API_KEY";
const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";

/// Main application configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Supabase project URL.
    #[serde(skip, default = "default_supabase_url")]
    pub supabase_url: String,
    /// Supabase anon (public) API key.
    #[serde(skip, default = "default_supabase_anon_key")]
    pub supabase_anon_key: String,
    /// Gemini API key. Only ever read from the environment.
    #[serde(skip)]
    pub gemini_api_key: Option<String>,
    /// Gemini model identifier.
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    /// Milliseconds to show the password-updated message before returning to login.
    #[serde(default = "default_password_redirect_delay_ms")]
    pub password_redirect_delay_ms: u64,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_supabase_url() -> String {
    DEFAULT_SUPABASE_URL.to_string()
}

fn default_supabase_anon_key() -> String {
    DEFAULT_SUPABASE_ANON_KEY.to_string()
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_password_redirect_delay_ms() -> u64 {
    DEFAULT_PASSWORD_REDIRECT_DELAY_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            supabase_url: default_supabase_url(),
            supabase_anon_key: default_supabase_anon_key(),
            gemini_api_key: None,
            gemini_model: default_gemini_model(),
            password_redirect_delay_ms: DEFAULT_PASSWORD_REDIRECT_DELAY_MS,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("log_level", &self.log_level)
            .field("supabase_url", &self.supabase_url)
            .field("supabase_anon_key", &self.supabase_anon_key)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("password_redirect_delay_ms", &self.password_redirect_delay_ms)
            .finish()
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from the optional config file, then the environment.
    ///
    /// The Supabase endpoint, anon key and Gemini key are never taken from the
    /// file.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    fn load_from_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// Override fields from environment-style lookups.
    ///
    /// Empty values are treated as unset. `API_KEY` is accepted when
    /// `GEMINI_API_KEY` is absent.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(url) = get(ENV_SUPABASE_URL) {
            self.supabase_url = url;
        }
        if let Some(key) = get(ENV_SUPABASE_ANON_KEY) {
            self.supabase_anon_key = key;
        }
        if let Some(key) = get(ENV_GEMINI_API_KEY).or_else(|| get(ENV_GEMINI_API_KEY_FALLBACK)) {
            self.gemini_api_key = Some(key);
        }
        if let Some(model) = get(ENV_GEMINI_MODEL) {
            self.gemini_model = model;
        }
    }

    /// Get the Supabase URL as a parsed URL.
    pub fn supabase_url(&self) -> CoreResult<Url> {
        Url::parse(&self.supabase_url).map_err(CoreError::from)
    }

    /// Delay before the update-password screen returns to login.
    pub fn password_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.password_redirect_delay_ms)
    }

    /// Check that everything needed to talk to both services is present.
    pub fn validate(&self) -> CoreResult<()> {
        let url = self.supabase_url()?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(CoreError::Config(format!(
                "SUPABASE_URL must be an http(s) URL, got scheme '{}'",
                url.scheme()
            )));
        }

        if self.supabase_anon_key.trim().is_empty() {
            return Err(CoreError::Config("SUPABASE_ANON_KEY is empty".to_string()));
        }

        match &self.gemini_api_key {
            Some(key) if !key.trim().is_empty() => {}
            _ => {
                return Err(CoreError::Config(
                    "GEMINI_API_KEY (or API_KEY) must be set".to_string(),
                ))
            }
        }

        if self.gemini_model.trim().is_empty() {
            return Err(CoreError::Config("gemini_model is empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.gemini_api_key = Some("gemini-key".to_string());
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.supabase_url, DEFAULT_SUPABASE_URL);
        assert_eq!(config.supabase_anon_key, DEFAULT_SUPABASE_ANON_KEY);
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.password_redirect_delay(), Duration::from_millis(2500));
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        std::fs::write(
            &config_path,
            r#"{ "log_level": "debug", "gemini_model": "gemini-2.5-pro" }"#,
        )
        .unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.gemini_model, "gemini-2.5-pro");
        assert_eq!(
            config.password_redirect_delay_ms,
            DEFAULT_PASSWORD_REDIRECT_DELAY_MS
        );
    }

    #[test]
    fn test_file_cannot_supply_endpoint_or_keys() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        std::fs::write(
            &config_path,
            r#"{
                "supabase_url": "https://evil.example.com",
                "supabase_anon_key": "from-file",
                "gemini_api_key": "from-file"
            }"#,
        )
        .unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.supabase_url, DEFAULT_SUPABASE_URL);
        assert_eq!(config.supabase_anon_key, DEFAULT_SUPABASE_ANON_KEY);
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_config_load_rejects_malformed_file() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        std::fs::write(paths.config_file(), "{ not json").unwrap();

        assert!(matches!(Config::load(&paths), Err(CoreError::Json(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(lookup_from(&[
            ("DIET_ARCHITECT_LOG_LEVEL", "trace"),
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("GEMINI_API_KEY", "gemini"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
        ]));

        assert_eq!(config.log_level, "trace");
        assert_eq!(config.supabase_url, "https://abc.supabase.co");
        assert_eq!(config.supabase_anon_key, "anon");
        assert_eq!(config.gemini_api_key.as_deref(), Some("gemini"));
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
    }

    #[test]
    fn test_api_key_fallback() {
        let mut config = Config::default();
        config.apply_env(lookup_from(&[("API_KEY", "legacy")]));
        assert_eq!(config.gemini_api_key.as_deref(), Some("legacy"));

        let mut config = Config::default();
        config.apply_env(lookup_from(&[("API_KEY", "legacy"), ("GEMINI_API_KEY", "primary")]));
        assert_eq!(config.gemini_api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env(lookup_from(&[("GEMINI_API_KEY", "  "), ("GEMINI_MODEL", "")]));

        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_requires_gemini_key() {
        let config = Config::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, CoreError::Config(msg) if msg.contains("GEMINI_API_KEY")));
    }

    #[test]
    fn test_validate_rejects_invalid_url() {
        let mut config = valid_config();
        config.supabase_url = "not a valid url".to_string();
        assert!(matches!(config.validate(), Err(CoreError::InvalidUrl(_))));

        config.supabase_url = "ftp://files.example.com".to_string();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_anon_key() {
        let mut config = valid_config();
        config.supabase_anon_key = String::new();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_debug_redacts_gemini_key() {
        let rendered = format!("{:?}", valid_config());
        assert!(!rendered.contains("gemini-key"));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn test_default_constants() {
        assert!(!DEFAULT_SUPABASE_URL.is_empty());
        assert!(!DEFAULT_SUPABASE_ANON_KEY.is_empty());
        assert!(DEFAULT_SUPABASE_URL.starts_with("https://"));
    }
}
