//! Configuration loading from skiff.toml.

use chat::Limits;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Per-request limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Backend provider configuration.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Model to use.
    #[serde(default = "default_model")]
    pub model: String,

    /// Gemini API key. Falls back to the GEMINI_API_KEY environment
    /// variable when unset.
    pub api_key: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
        }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

/// Per-request limits, all optional; unset fields take the runtime
/// defaults.
#[derive(Debug, Deserialize, Default)]
pub struct LimitsConfig {
    /// Maximum tool rounds per user request.
    pub max_tool_rounds: Option<usize>,

    /// Deadline for each model call, in seconds.
    pub model_timeout_secs: Option<u64>,

    /// Deadline for each tool dispatch, in seconds.
    pub tool_timeout_secs: Option<u64>,
}

impl LimitsConfig {
    pub fn to_limits(&self) -> Limits {
        let defaults = Limits::default();
        Limits {
            max_tool_rounds: self.max_tool_rounds.unwrap_or(defaults.max_tool_rounds),
            model_timeout: self
                .model_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.model_timeout),
            tool_timeout: self
                .tool_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.tool_timeout),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Resolve the API key from config or environment.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        if let Some(key) = &self.backend.api_key {
            return Ok(key.clone());
        }
        std::env::var("GEMINI_API_KEY").map_err(|_| ConfigError::MissingApiKey)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("API key not configured: set backend.api_key or GEMINI_API_KEY")]
    MissingApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = Config::parse(
            r#"
[backend]
model = "gemini-2.0-pro"
api_key = "test-key"

[limits]
max_tool_rounds = 3
tool_timeout_secs = 5
"#,
        )
        .unwrap();

        assert_eq!(config.backend.model, "gemini-2.0-pro");
        assert_eq!(config.api_key().unwrap(), "test-key");

        let limits = config.limits.to_limits();
        assert_eq!(limits.max_tool_rounds, 3);
        assert_eq!(limits.tool_timeout, Duration::from_secs(5));
        // Unset fields keep the runtime default.
        assert_eq!(limits.model_timeout, Limits::default().model_timeout);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.backend.model, "gemini-2.0-flash");
        assert_eq!(
            config.limits.to_limits().max_tool_rounds,
            Limits::default().max_tool_rounds
        );
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::parse("[backend\nmodel = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
