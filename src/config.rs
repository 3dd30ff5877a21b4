//! Runtime configuration
//!
//! Everything is read from environment variables once at startup.

use std::path::PathBuf;

use thiserror::Error;

pub const DATABASE_PATH_ENV: &str = "NUTRILOG_DATABASE_PATH";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";
pub const VISION_MODEL_ENV: &str = "NUTRILOG_VISION_MODEL";
pub const VISION_BASE_URL_ENV: &str = "NUTRILOG_VISION_BASE_URL";

pub const DEFAULT_VISION_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_VISION_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} is set but empty")]
    Empty { name: &'static str },

    #[error("{name} must be an http(s) URL, got '{value}'")]
    InvalidUrl { name: &'static str, value: String },
}

/// Settings for the photo analysis service
#[derive(Clone, PartialEq)]
pub struct VisionConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl std::fmt::Debug for VisionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub vision: VisionConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = match lookup(DATABASE_PATH_ENV) {
            Some(path) if path.trim().is_empty() => return Err(ConfigError::Empty { name: DATABASE_PATH_ENV }),
            Some(path) => PathBuf::from(path),
            None => default_database_path(),
        };

        let api_key = lookup(API_KEY_ENV)
            .or_else(|| lookup(FALLBACK_API_KEY_ENV))
            .filter(|key| !key.trim().is_empty());

        let model = match lookup(VISION_MODEL_ENV) {
            Some(model) if model.trim().is_empty() => return Err(ConfigError::Empty { name: VISION_MODEL_ENV }),
            Some(model) => model.trim().to_string(),
            None => DEFAULT_VISION_MODEL.to_string(),
        };

        let base_url = lookup(VISION_BASE_URL_ENV).unwrap_or_else(|| DEFAULT_VISION_BASE_URL.to_string());
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(ConfigError::InvalidUrl { name: VISION_BASE_URL_ENV, value: base_url });
        }

        Ok(Self {
            database_path,
            vision: VisionConfig { api_key, model, base_url },
        })
    }
}

/// `<project>/data/nutrilog.db`, where the project root is found by stepping
/// out of `target/{debug,release}` when running from a cargo build
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("nutrilog.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert!(cfg.database_path.ends_with("data/nutrilog.db"));
        assert_eq!(cfg.vision.api_key, None);
        assert_eq!(cfg.vision.model, DEFAULT_VISION_MODEL);
        assert_eq!(cfg.vision.base_url, DEFAULT_VISION_BASE_URL);
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            (DATABASE_PATH_ENV, "/tmp/diary.db"),
            (API_KEY_ENV, "primary"),
            (FALLBACK_API_KEY_ENV, "fallback"),
            (VISION_MODEL_ENV, "gemini-2.0-flash"),
            (VISION_BASE_URL_ENV, "http://localhost:8080"),
        ])
        .unwrap();
        assert_eq!(cfg.database_path, PathBuf::from("/tmp/diary.db"));
        assert_eq!(cfg.vision.api_key.as_deref(), Some("primary"));
        assert_eq!(cfg.vision.model, "gemini-2.0-flash");
        assert_eq!(cfg.vision.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_api_key_fallback() {
        let cfg = config(&[(FALLBACK_API_KEY_ENV, "fallback")]).unwrap();
        assert_eq!(cfg.vision.api_key.as_deref(), Some("fallback"));

        let cfg = config(&[(API_KEY_ENV, " ")]).unwrap();
        assert_eq!(cfg.vision.api_key, None);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            config(&[(DATABASE_PATH_ENV, "")]).unwrap_err(),
            ConfigError::Empty { name: DATABASE_PATH_ENV }
        );
        assert!(matches!(
            config(&[(VISION_BASE_URL_ENV, "generativelanguage.googleapis.com")]),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let cfg = config(&[(API_KEY_ENV, "secret")]).unwrap();
        assert!(!format!("{:?}", cfg).contains("secret"));
    }
}
