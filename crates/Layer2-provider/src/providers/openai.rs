//! OpenAI provider implementation
//!
//! Also serves OpenAI-compatible endpoints (OpenRouter, Hugging Face router)
//! through `with_base_url` + `with_identity`.

use crate::{
    error::ProviderError,
    r#trait::{GenerationParams, Provider, ProviderMetadata},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// OpenAI (and OpenAI-compatible) provider
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    metadata: ProviderMetadata,
    base_url: String,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .build()
                .expect("Failed to create HTTP client"),
            api_key: api_key.into(),
            model: model.into(),
            metadata: ProviderMetadata {
                id: "openai".to_string(),
                display_name: "OpenAI".to_string(),
                default_model: "gpt-4o-mini".to_string(),
                base_url: DEFAULT_BASE_URL.to_string(),
            },
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Use a different API root (OpenRouter, Hugging Face, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.metadata.base_url = self.base_url.clone();
        self
    }

    /// Rebrand for OpenAI-compatible services
    pub fn with_identity(
        mut self,
        id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        self.metadata.id = id.into();
        self.metadata.display_name = display_name.into();
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, prompt: &str, params: &GenerationParams) -> OpenAiRequest {
        OpenAiRequest {
            model: self.model.clone(),
            messages: vec![OpenAiMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            // top_k is not part of the chat completions API
            max_tokens: params.max_output_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
        }
    }

    /// Parse error response from the API
    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> ProviderError {
        if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            let error = error_response.error;
            let message = error.message;

            return match error.code.as_deref() {
                Some("rate_limit_exceeded") => ProviderError::RateLimited {
                    message,
                    retry_after_ms: None,
                },
                Some("insufficient_quota") => ProviderError::QuotaExceeded(message),
                Some("invalid_api_key") => ProviderError::Authentication(message),
                Some("model_not_found") => ProviderError::ModelNotFound(message),
                _ => ProviderError::from_http_status(status.as_u16(), &message),
            };
        }

        ProviderError::from_http_status(status.as_u16(), body)
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        let request = self.build_request(prompt, params);

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Self::parse_error_response(status, &body));
        }

        let api_response: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let choice = api_response.choices.into_iter().next().ok_or_else(|| {
            ProviderError::InvalidResponse("No choices in response".to_string())
        })?;

        if choice.finish_reason.as_deref() == Some("length") {
            tracing::warn!(
                "{} response truncated at max tokens",
                self.metadata.display_name
            );
        }

        choice
            .message
            .content
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                ProviderError::InvalidResponse("Empty message content".to_string())
            })
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ============================================================================
// OpenAI API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

// Response types
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

// Error types
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiError,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    message: String,
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_completions_url() {
        let provider = OpenAiProvider::new("k", "gpt-4o-mini");
        assert_eq!(
            provider.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );

        let rerouted = OpenAiProvider::new("k", "m").with_base_url("https://openrouter.ai/api/v1");
        assert_eq!(
            rerouted.completions_url(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_identity_rebrand() {
        let provider = OpenAiProvider::new("k", "m").with_identity("openrouter", "OpenRouter");
        assert_eq!(provider.metadata().id, "openrouter");
        assert_eq!(provider.metadata().display_name, "OpenRouter");
    }

    #[test]
    fn test_parse_error_rate_limit() {
        let body = r#"{"error": {"message": "Rate limit reached", "code": "rate_limit_exceeded"}}"#;
        let err = OpenAiProvider::parse_error_response(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            body,
        );
        assert!(matches!(err, ProviderError::RateLimited { .. }));
    }

    #[test]
    fn test_parse_error_insufficient_quota() {
        let body = r#"{"error": {"message": "You exceeded your current quota", "code": "insufficient_quota"}}"#;
        let err = OpenAiProvider::parse_error_response(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            body,
        );
        assert!(matches!(err, ProviderError::QuotaExceeded(_)));
    }

    #[tokio::test]
    async fn test_generate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "fix: handle empty diff"},
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new("test-key", "gpt-4o-mini")
            .with_base_url(server.uri());
        let text = provider
            .generate("write a commit message", &GenerationParams::default())
            .await
            .unwrap();

        assert_eq!(text, "fix: handle empty diff");
    }
}
