//! Hub configuration
//!
//! Loaded from TOML. Every section has defaults, so a missing file or a
//! partial file both produce a usable configuration. Secrets are never stored
//! in the file; the `[llm]` section names the environment variable that holds
//! the API key and it is read when the provider is built.

use crate::routing::mention::is_valid_tag;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Main hub configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HubConfig {
    #[serde(default)]
    pub hub: HubSection,
    #[serde(default)]
    pub llm: LlmSection,
}

/// `[hub]` section: chat surface and routing behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HubSection {
    /// Title shown in the welcome message
    #[serde(default = "default_hub_name")]
    pub name: String,
    /// What to do with input that has no leading mention
    #[serde(default)]
    pub fallback: FallbackMode,
    /// Agent that receives un-mentioned input when `fallback = "default_agent"`
    #[serde(default = "default_agent_tag")]
    pub default_agent: String,
}

impl Default for HubSection {
    fn default() -> Self {
        Self {
            name: default_hub_name(),
            fallback: FallbackMode::default(),
            default_agent: default_agent_tag(),
        }
    }
}

/// Fallback handling for input without a leading `@tag`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FallbackMode {
    /// Reply with a usage hint and call nothing
    Reject,
    /// Forward the whole input to `default_agent`
    #[default]
    DefaultAgent,
}

/// `[llm]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmSection {
    /// Provider name ("gemini" or "openai")
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable containing the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Override for the provider's API base URL
    pub base_url: Option<String>,
    /// Optional temperature (0.0 to 2.0)
    pub temperature: Option<f32>,
    /// Optional max output tokens
    pub max_tokens: Option<u32>,
    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            base_url: None,
            temperature: None,
            max_tokens: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_hub_name() -> String {
    "AI Agents Hub".to_string()
}

fn default_agent_tag() -> String {
    "@director".to_string()
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl HubConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: HubConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field-level consistency. Whether `default_agent` is actually
    /// registered is checked when the controller is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_tag(&self.hub.default_agent) {
            return Err(ConfigError::InvalidConfig(format!(
                "default_agent '{}' must match pattern @[A-Za-z0-9_]+",
                self.hub.default_agent
            )));
        }

        if let Some(temperature) = self.llm.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::InvalidConfig(format!(
                    "temperature {temperature} must be between 0.0 and 2.0"
                )));
            }
        }

        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Get LLM API key from environment variable
    pub fn get_llm_api_key(&self) -> Result<String, ConfigError> {
        std::env::var(&self.llm.api_key_env)
            .map_err(|_| ConfigError::EnvVarNotFound(self.llm.api_key_env.clone()))
    }
}
