//! Provider-specific error types
//!
//! ProviderError는 생성 API 관련 세부 에러를 관리합니다.
//! gitforge_foundation::Error와의 변환을 지원합니다.

use crate::retry::{RetryClassification, RetryableError};
use gitforge_foundation::Error as FoundationError;
use thiserror::Error;

/// Markers that identify a rate-limit failure in a provider error message.
///
/// Matching is case-insensitive. Every rate-limit decision in this crate
/// goes through [`is_rate_limit_message`]; nothing else inspects these.
const RATE_LIMIT_MARKERS: [&str; 4] =
    ["429", "RESOURCE_EXHAUSTED", "QUOTA_EXCEEDED", "THROTTLED"];

/// Whether an error message indicates a retryable rate-limit failure
pub fn is_rate_limit_message(message: &str) -> bool {
    let upper = message.to_uppercase();
    RATE_LIMIT_MARKERS.iter().any(|m| upper.contains(m))
}

/// Errors that can occur during provider operations
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// API key is missing or invalid
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limit exceeded
    #[error("Rate limited: {message}{}", .retry_after_ms.map(|ms| format!(" (retry after {}ms)", ms)).unwrap_or_default())]
    RateLimited {
        message: String,
        retry_after_ms: Option<u64>,
    },

    /// Quota exceeded (billing or plan limit, not transient)
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Server error (5xx)
    #[error("Server error: {0}")]
    ServerError(String),

    /// Network error (connection failed, DNS, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid request (bad parameters)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid response from API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not found
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Provider not configured
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Retries exhausted on a rate-limited call
    #[error("{guidance}")]
    RetriesExhausted {
        attempts: u32,
        guidance: String,
        #[source]
        source: Box<ProviderError>,
    },

    /// Unknown error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl RetryableError for ProviderError {
    fn classify(&self) -> RetryClassification {
        match self {
            ProviderError::RateLimited { .. } => RetryClassification::RateLimited,

            // Terminal by construction, never re-enter the retry loop
            ProviderError::RetriesExhausted { .. } => RetryClassification::NoRetry,

            // Some providers bury the 429 in an opaque message
            other if is_rate_limit_message(&other.to_string()) => {
                RetryClassification::RateLimited
            }

            _ => RetryClassification::NoRetry,
        }
    }
}

impl ProviderError {
    /// Create from HTTP status code and body
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => ProviderError::Authentication(body.to_string()),
            429 => ProviderError::RateLimited {
                message: body.to_string(),
                retry_after_ms: extract_retry_after(body),
            },
            400 => ProviderError::InvalidRequest(body.to_string()),
            404 => ProviderError::ModelNotFound(body.to_string()),
            500..=599 => ProviderError::ServerError(body.to_string()),
            _ => ProviderError::Unknown(format!("HTTP {}: {}", status, body)),
        }
    }

    /// Wrap the final rate-limit failure once the retry budget is spent.
    ///
    /// The guidance text walks the user through the usual suspects; the
    /// original failure is kept as `source`.
    pub fn retries_exhausted(provider: &str, attempts: u32, cause: ProviderError) -> Self {
        let guidance = format!(
            "{provider} quota exhausted after {attempts} attempts.\n\n\
             Possible causes:\n\
             \x20 1. Rate limit hit (requests per minute or per day)\n\
             \x20 2. Daily free-tier quota reached\n\
             \x20 3. Billing or credit issue on the account\n\n\
             Check the provider usage dashboard before retrying."
        );
        ProviderError::RetriesExhausted {
            attempts,
            guidance,
            source: Box::new(cause),
        }
    }
}

/// Try to extract retry-after value from error body (in milliseconds)
fn extract_retry_after(body: &str) -> Option<u64> {
    // Try to find retry_after in JSON
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(secs) = json
            .get("error")
            .and_then(|e| e.get("retry_after"))
            .and_then(|v| v.as_f64())
        {
            return Some((secs * 1000.0) as u64);
        }
    }

    // Try to find in plain text
    if let Some(idx) = body.find("retry") {
        let after = &body[idx..];
        let num_str: String = after
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        if let Ok(secs) = num_str.parse::<f64>() {
            return Some((secs * 1000.0) as u64);
        }
    }

    None
}

// ============================================================================
// gitforge_foundation::Error 변환
// ============================================================================

impl From<ProviderError> for FoundationError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Authentication(msg) => FoundationError::Api {
                provider: "unknown".to_string(),
                message: format!("Authentication failed: {}", msg),
            },
            ProviderError::RateLimited { .. } => FoundationError::RateLimited(err.to_string()),
            ProviderError::RetriesExhausted { .. } => {
                FoundationError::RateLimited(err.to_string())
            }
            ProviderError::QuotaExceeded(msg) => FoundationError::RateLimited(msg),
            ProviderError::ServerError(msg) => FoundationError::Api {
                provider: "unknown".to_string(),
                message: format!("Server error: {}", msg),
            },
            ProviderError::Network(msg) => FoundationError::Http(msg),
            ProviderError::InvalidRequest(msg) => FoundationError::InvalidInput(msg),
            ProviderError::InvalidResponse(msg) => {
                FoundationError::Provider(format!("Invalid response: {}", msg))
            }
            ProviderError::ModelNotFound(msg) => FoundationError::ProviderNotFound(msg),
            ProviderError::NotConfigured(msg) => FoundationError::Config(msg),
            ProviderError::Unknown(msg) => FoundationError::Provider(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_markers() {
        assert!(is_rate_limit_message("HTTP 429: slow down"));
        assert!(is_rate_limit_message("RESOURCE_EXHAUSTED: quota"));
        assert!(is_rate_limit_message("resource_exhausted"));
        assert!(is_rate_limit_message("request throttled, retry later"));
        assert!(is_rate_limit_message("QUOTA_EXCEEDED for model"));

        assert!(!is_rate_limit_message("invalid api key"));
        assert!(!is_rate_limit_message("model not found"));
    }

    #[test]
    fn test_classification() {
        let rate_limited = ProviderError::RateLimited {
            message: "too many requests".to_string(),
            retry_after_ms: None,
        };
        assert_eq!(rate_limited.classify(), RetryClassification::RateLimited);

        // An opaque error whose message carries a marker is still retryable
        let opaque = ProviderError::Unknown("upstream said THROTTLED".to_string());
        assert_eq!(opaque.classify(), RetryClassification::RateLimited);

        let auth = ProviderError::Authentication("bad key".to_string());
        assert_eq!(auth.classify(), RetryClassification::NoRetry);

        let exhausted = ProviderError::retries_exhausted("Gemini", 6, rate_limited);
        assert_eq!(exhausted.classify(), RetryClassification::NoRetry);
    }

    #[test]
    fn test_from_http_status() {
        assert!(matches!(
            ProviderError::from_http_status(429, "slow down"),
            ProviderError::RateLimited { .. }
        ));
        assert!(matches!(
            ProviderError::from_http_status(401, "bad key"),
            ProviderError::Authentication(_)
        ));
        assert!(matches!(
            ProviderError::from_http_status(503, "overloaded"),
            ProviderError::ServerError(_)
        ));
        assert!(matches!(
            ProviderError::from_http_status(404, "no such model"),
            ProviderError::ModelNotFound(_)
        ));
    }

    #[test]
    fn test_extract_retry_after() {
        let body = r#"{"error": {"retry_after": 2.5}}"#;
        assert_eq!(extract_retry_after(body), Some(2500));

        let body = "please retry after 30 seconds";
        assert_eq!(extract_retry_after(body), Some(30000));

        assert_eq!(extract_retry_after("no hint here"), None);
    }

    #[test]
    fn test_retries_exhausted_keeps_cause() {
        let cause = ProviderError::RateLimited {
            message: "RESOURCE_EXHAUSTED".to_string(),
            retry_after_ms: None,
        };
        let err = ProviderError::retries_exhausted("Gemini", 6, cause);

        let text = err.to_string();
        assert!(text.contains("Gemini quota exhausted after 6 attempts"));
        assert!(text.contains("Rate limit"));
        assert!(text.contains("Billing"));

        match err {
            ProviderError::RetriesExhausted {
                attempts, source, ..
            } => {
                assert_eq!(attempts, 6);
                assert!(matches!(*source, ProviderError::RateLimited { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
