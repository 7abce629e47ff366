use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Config directory not found")]
    DirectoryNotFound,

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenAI,
    Anthropic,
}

impl Provider {
    pub fn default_model(self) -> &'static str {
        match self {
            Provider::OpenAI => "gpt-4o-mini",
            Provider::Anthropic => "claude-sonnet-4-5-20250929",
        }
    }

    pub fn default_api_key_env(self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::Anthropic => "https://api.anthropic.com",
        }
    }
}

/// Settings loaded once at startup and passed to every component
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub llm: LLMConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct LLMConfig {
    pub provider: Provider,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: u64,
    /// Retries on HTTP 429 only
    pub max_retries: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct BehaviorConfig {
    pub pager: bool,
    pub log_commands: bool,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: None,
            api_key_env: None,
            api_key: None,
            base_url: None,
            timeout_seconds: 30,
            max_retries: 3,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            pager: true,
            log_commands: true,
        }
    }
}

impl LLMConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.provider.default_api_key_env())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Config {
    /// Get the config directory path: $XDG_CONFIG_HOME/agit or ~/.config/agit
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(xdg).join("agit"));
        }
        let home = std::env::var_os("HOME").ok_or(ConfigError::DirectoryNotFound)?;
        Ok(PathBuf::from(home).join(".config").join("agit"))
    }

    /// Get the config file path, honouring AGIT_CONFIG
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os("AGIT_CONFIG").filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration, falling back to defaults when no file exists
    pub fn load() -> Result<Self, ConfigError> {
        let Ok(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load and validate configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(ConfigError::InvalidValue(
                "model must not be empty".to_string(),
            ));
        }

        if self.llm.api_key_env.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(ConfigError::InvalidValue(
                "api_key_env must not be empty".to_string(),
            ));
        }

        if self.llm.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue(
                "timeout_seconds must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get API key from the environment or, failing that, the config file
    pub fn api_key(&self) -> Option<String> {
        self.api_key_from(|name| std::env::var(name).ok())
    }

    /// Resolve the API key with a custom environment lookup
    pub fn api_key_from<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(self.llm.api_key_env())
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                self.llm
                    .api_key
                    .clone()
                    .filter(|key| !key.trim().is_empty())
            })
    }

    /// One-line message shown when no API key can be found
    pub fn missing_api_key_message(&self) -> String {
        format!(
            "API key was not set ({}), please set it before using agit.",
            self.llm.api_key_env()
        )
    }
}
