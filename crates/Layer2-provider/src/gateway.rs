//! LLM Gateway - routes generation requests to the configured provider
//!
//! The Gateway holds the providers built from user configuration and wraps
//! every generation call in the retry policy for rate-limited failures.

use crate::{
    providers::{
        anthropic::AnthropicProvider, gemini::GeminiProvider, openai::OpenAiProvider,
    },
    retry::{with_retry, RetryConfig},
    GenerationParams, Provider, ProviderError,
};
use gitforge_foundation::{Error, GitForgeConfig, ProviderType, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Gateway that manages LLM providers
pub struct Gateway {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
    retry_config: RetryConfig,
    params: GenerationParams,
}

impl Gateway {
    /// Create a gateway from user configuration
    ///
    /// Fails with a configuration error when the selected provider has no
    /// API key, so the problem surfaces before any prompt is built.
    pub fn from_config(config: &GitForgeConfig) -> Result<Self> {
        let provider_type = config.provider;
        let api_key = config.api_key.clone().unwrap_or_default();

        if provider_type.requires_api_key() && api_key.is_empty() {
            return Err(Error::Config(format!(
                "No API key configured for {}. Set {} or run `gitforge config`.",
                provider_type.name(),
                provider_type.env_key()
            )));
        }

        let model = config.effective_model();
        let provider: Arc<dyn Provider> = match provider_type {
            ProviderType::Gemini => Arc::new(GeminiProvider::new(api_key, model)),
            ProviderType::Openai => Arc::new(OpenAiProvider::new(api_key, model)),
            ProviderType::Anthropic => Arc::new(AnthropicProvider::new(api_key, model)),
            // OpenRouter and Hugging Face speak the OpenAI chat completions
            // protocol, so they reuse the OpenAI client with a different base.
            ProviderType::Openrouter => Arc::new(
                OpenAiProvider::new(api_key, model)
                    .with_base_url(provider_type.default_base_url())
                    .with_identity("openrouter", "OpenRouter"),
            ),
            ProviderType::Huggingface => Arc::new(
                OpenAiProvider::new(api_key, model)
                    .with_base_url(provider_type.default_base_url())
                    .with_identity("huggingface", "Hugging Face"),
            ),
        };

        let name = provider_type.to_string();
        let mut providers: HashMap<String, Arc<dyn Provider>> = HashMap::new();
        providers.insert(name.clone(), provider);

        Ok(Self {
            providers,
            default_provider: name,
            retry_config: RetryConfig::default(),
            params: GenerationParams::default(),
        })
    }

    /// Create gateway by loading config from files and environment
    pub fn load() -> Result<Self> {
        let config = GitForgeConfig::load()?;
        Self::from_config(&config)
    }

    /// Create an empty gateway (for testing or manual provider setup)
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: String::new(),
            retry_config: RetryConfig::default(),
            params: GenerationParams::default(),
        }
    }

    /// Add a provider to the gateway
    pub fn add_provider(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        let name = name.into();
        if self.providers.is_empty() {
            self.default_provider = name.clone();
        }
        self.providers.insert(name, provider);
    }

    /// Set retry configuration
    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Set generation parameters
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Get the default provider
    pub fn default_provider(&self) -> Result<Arc<dyn Provider>> {
        self.get_provider(&self.default_provider)
    }

    /// Get a specific provider by name
    pub fn get_provider(&self, name: &str) -> Result<Arc<dyn Provider>> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ProviderNotFound(name.to_string()))
    }

    /// List available providers
    pub fn list_providers(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }

    /// Check if a provider is available
    pub fn is_provider_available(&self, name: &str) -> bool {
        self.providers
            .get(name)
            .map(|p| p.is_available())
            .unwrap_or(false)
    }

    /// Generate text using the default provider, retrying rate limits
    ///
    /// Returns the generated text with surrounding whitespace trimmed.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let provider = self.default_provider()?;

        if !provider.is_available() {
            return Err(ProviderError::NotConfigured(format!(
                "{} has no API key",
                provider.metadata().display_name
            ))
            .into());
        }

        let operation_name = provider.metadata().display_name.clone();
        let text = with_retry(&self.retry_config, &operation_name, || async {
            provider.generate(prompt, &self.params).await
        })
        .await
        .map_err(Error::from)?;

        Ok(text.trim().to_string())
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_empty() {
        let gateway = Gateway::new();
        assert!(gateway.list_providers().is_empty());
        assert!(gateway.default_provider().is_err());
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = GitForgeConfig::default();
        let err = Gateway::from_config(&config).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("GEMINI_API_KEY"));
        assert!(text.contains("gitforge config"));
    }

    #[test]
    fn test_from_config_builds_selected_provider() {
        let config = GitForgeConfig::default()
            .provider(ProviderType::Anthropic)
            .api_key("sk-test");
        let gateway = Gateway::from_config(&config).unwrap();
        assert_eq!(gateway.list_providers(), vec!["anthropic"]);
        assert!(gateway.is_provider_available("anthropic"));
    }

    #[test]
    fn test_from_config_openrouter_uses_openai_protocol() {
        let config = GitForgeConfig::default()
            .provider(ProviderType::Openrouter)
            .api_key("or-test");
        let gateway = Gateway::from_config(&config).unwrap();
        let provider = gateway.default_provider().unwrap();
        assert_eq!(provider.metadata().display_name, "OpenRouter");
        assert!(provider.metadata().base_url.contains("openrouter.ai"));
        assert_eq!(provider.model_id(), "google/gemini-2.5-flash");
    }

    #[tokio::test]
    async fn test_generate_unavailable_provider() {
        let mut gateway = Gateway::new();
        gateway.add_provider("gemini", Arc::new(GeminiProvider::new("", "gemini-2.5-flash")));
        let err = gateway.generate("hello").await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
