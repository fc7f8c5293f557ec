//! Provider trait and common types

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sampling parameters for a generation request.
///
/// Defaults: temperature 0.7, top_p 0.95, top_k 40, 2048 output tokens.
/// Providers map these onto their wire format and skip what their API
/// does not support (OpenAI-compatible APIs have no top_k).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling probability mass
    pub top_p: f32,

    /// Top-k sampling cutoff
    pub top_k: u32,

    /// Maximum number of tokens to generate
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 2048,
        }
    }
}

impl GenerationParams {
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

/// Provider metadata
#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    /// Provider ID (e.g., "gemini")
    pub id: String,

    /// Display name (e.g., "Gemini")
    pub display_name: String,

    /// Default model ID
    pub default_model: String,

    /// Base URL the provider talks to
    pub base_url: String,
}

/// Text generation provider trait
///
/// Implement this trait to add support for a new provider.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get provider metadata
    fn metadata(&self) -> &ProviderMetadata;

    /// Current model ID
    fn model_id(&self) -> &str;

    /// Generate text for a single prompt (non-streaming)
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError>;

    /// Check if the provider is available (e.g., API key is set)
    fn is_available(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_defaults() {
        let params = GenerationParams::default();
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.top_p, 0.95);
        assert_eq!(params.top_k, 40);
        assert_eq!(params.max_output_tokens, 2048);
    }

    #[test]
    fn test_params_builder() {
        let params = GenerationParams::default()
            .temperature(0.2)
            .max_output_tokens(512);
        assert_eq!(params.temperature, 0.2);
        assert_eq!(params.max_output_tokens, 512);
        assert_eq!(params.top_k, 40);
    }
}
