//! # gitforge-provider
//!
//! LLM provider abstraction layer for GitForge.
//! Supports multiple providers with a unified interface.
//!
//! ## Features
//! - Automatic retry with exponential backoff on rate limits
//! - Multiple provider support (Gemini, OpenAI, Anthropic, OpenRouter, Hugging Face)
//! - Unified generation parameters across providers

pub mod error;
pub mod gateway;
pub mod providers;
pub mod retry;
pub mod r#trait;

// Core traits and types
pub use gateway::Gateway;
pub use r#trait::{GenerationParams, Provider, ProviderMetadata};

// Error and retry
pub use error::ProviderError;
pub use retry::{RetryClassification, RetryConfig, RetryableError};

// Provider implementations
pub use providers::anthropic::AnthropicProvider;
pub use providers::gemini::GeminiProvider;
pub use providers::openai::OpenAiProvider;
