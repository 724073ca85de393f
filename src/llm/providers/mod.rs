//! Hosted LLM backends

pub mod gemini;
pub mod openai;

pub use gemini::{GeminiConfig, GeminiProvider};
pub use openai::{OpenAiConfig, OpenAiProvider};

use crate::config::{ConfigError, HubConfig};
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmError, LlmProvider};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Build the provider named in `[llm] provider`
pub fn provider_from_config(config: &HubConfig) -> Result<Arc<dyn LlmProvider>, ConfigError> {
    let api_key = config.get_llm_api_key()?;
    let timeout = Duration::from_secs(config.llm.timeout_secs);

    match config.llm.provider.as_str() {
        "gemini" => {
            let mut gemini_config = GeminiConfig {
                api_key,
                timeout,
                ..Default::default()
            };
            if let Some(base_url) = &config.llm.base_url {
                gemini_config.base_url = base_url.clone();
            }
            let provider = GeminiProvider::new(gemini_config)
                .map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
            Ok(Arc::new(provider))
        }
        "openai" => {
            let mut openai_config = OpenAiConfig {
                api_key,
                timeout,
                ..Default::default()
            };
            if let Some(base_url) = &config.llm.base_url {
                openai_config.base_url = base_url.clone();
            }
            let provider = OpenAiProvider::new(openai_config)
                .map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
            Ok(Arc::new(provider))
        }
        other => Err(ConfigError::InvalidConfig(format!(
            "Unsupported LLM provider: {other}"
        ))),
    }
}

/// Stand-in provider used when no API key is available. Every completion
/// fails with [`LlmError::NotConfigured`], so agents still validate input and
/// can be listed.
#[derive(Debug, Clone)]
pub struct UnconfiguredProvider {
    reason: String,
}

impl UnconfiguredProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl LlmProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::NotConfigured(self.reason.clone()))
    }
}
