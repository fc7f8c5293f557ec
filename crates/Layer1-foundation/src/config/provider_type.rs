use serde::{Deserialize, Serialize};

/// 프로바이더 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Gemini,
    Openai,
    Anthropic,
    Openrouter,
    Huggingface,
}

impl ProviderType {
    /// 전체 목록 (설정 마법사 순서)
    pub fn all() -> &'static [ProviderType] {
        &[
            Self::Gemini,
            Self::Openai,
            Self::Anthropic,
            Self::Openrouter,
            Self::Huggingface,
        ]
    }

    /// 표시 이름
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::Openai => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Openrouter => "OpenRouter",
            Self::Huggingface => "Hugging Face",
        }
    }

    /// API Key 필요 여부
    pub fn requires_api_key(&self) -> bool {
        true
    }

    /// API Key 환경변수 이름
    pub fn env_key(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::Openai => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Openrouter => "OPENROUTER_API_KEY",
            Self::Huggingface => "HF_TOKEN",
        }
    }

    /// 기본 Base URL
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Self::Openai => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com",
            Self::Openrouter => "https://openrouter.ai/api/v1",
            Self::Huggingface => "https://router.huggingface.co/v1",
        }
    }

    /// 기본 모델
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.5-flash",
            Self::Openai => "gpt-4o-mini",
            Self::Anthropic => "claude-3-5-haiku-latest",
            Self::Openrouter => "google/gemini-2.5-flash",
            Self::Huggingface => "meta-llama/Llama-3.3-70B-Instruct",
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name().to_lowercase().replace(' ', ""))
    }
}

impl Default for ProviderType {
    fn default() -> Self {
        Self::Gemini
    }
}
