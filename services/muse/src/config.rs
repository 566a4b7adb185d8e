use muse_core::llm_client::{DEFAULT_ENDPOINT, DEFAULT_MODEL, OllamaConfig};
use muse_core::style::StylePersona;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub model: String,
    pub ollama_url: String,
    pub style: String,
    pub use_mock: bool,
    pub poems_dir: PathBuf,
    pub request_timeout: Duration,
    pub log_level: Level,
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidValue(
            var.to_string(),
            format!("'{}' is not a boolean", other),
        )),
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let model = std::env::var("MUSE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        if model.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "MUSE_MODEL".to_string(),
                "model name must not be empty".to_string(),
            ));
        }

        let ollama_url =
            std::env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        if !ollama_url.starts_with("http://") && !ollama_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "OLLAMA_URL".to_string(),
                format!("'{}' is not an http(s) URL", ollama_url),
            ));
        }

        let style = std::env::var("MUSE_STYLE")
            .unwrap_or_else(|_| StylePersona::Shakespearean.label().to_string());

        let use_mock = match std::env::var("MUSE_MOCK") {
            Ok(v) => parse_bool("MUSE_MOCK", &v)?,
            Err(_) => false,
        };

        let poems_dir = std::env::var("POEMS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("poems"));

        let timeout_str =
            std::env::var("OLLAMA_TIMEOUT_SECS").unwrap_or_else(|_| "120".to_string());
        let timeout_secs = timeout_str
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "OLLAMA_TIMEOUT_SECS".to_string(),
                    format!("'{}' is not a positive number of seconds", timeout_str),
                )
            })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            model,
            ollama_url,
            style,
            use_mock,
            poems_dir,
            request_timeout: Duration::from_secs(timeout_secs),
            log_level,
        })
    }

    /// Connection settings for the generation client.
    pub fn ollama(&self) -> OllamaConfig {
        OllamaConfig {
            endpoint: self.ollama_url.clone(),
            timeout: self.request_timeout,
        }
    }
}
