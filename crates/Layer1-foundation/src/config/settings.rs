//! GitForge Config - 통합 설정
//!
//! 프로바이더, 모델, API 키, 커밋 이모지 설정을 하나의 문서로 관리

use crate::storage::JsonStore;
use crate::Result;
use serde::{Deserialize, Serialize};

use super::ProviderType;

/// 설정 파일명
pub const GITFORGE_CONFIG_FILE: &str = "config.json";

// ============================================================================
// GitForge Config
// ============================================================================

/// GitForge 통합 설정
///
/// `<config dir>/gitforge/config.json` 에 저장된다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitForgeConfig {
    /// 버전 (마이그레이션용)
    #[serde(default = "default_version")]
    pub version: u32,

    /// 활성 프로바이더
    #[serde(default)]
    pub provider: ProviderType,

    /// 모델 이름 (없으면 프로바이더 기본값)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// API 키 (없으면 환경변수에서 채움)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// 커밋 메시지에 gitmoji 사용
    #[serde(default = "default_true")]
    pub emoji: bool,
}

impl Default for GitForgeConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            provider: ProviderType::default(),
            model: None,
            api_key: None,
            emoji: true,
        }
    }
}

impl GitForgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load / Save
    // ========================================================================

    /// 글로벌 설정 로드 + 환경변수 오버라이드
    pub fn load() -> Result<Self> {
        let mut config = Self::load_global()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// 글로벌 설정만 로드
    pub fn load_global() -> Result<Self> {
        let store = JsonStore::global()?;
        Ok(store.load_or_default(GITFORGE_CONFIG_FILE))
    }

    /// 글로벌 설정 저장
    pub fn save_global(&self) -> Result<()> {
        let store = JsonStore::global()?;
        store.save(GITFORGE_CONFIG_FILE, self)
    }

    /// 설정 파일 존재 여부
    pub fn exists() -> bool {
        JsonStore::global()
            .map(|s| s.exists(GITFORGE_CONFIG_FILE))
            .unwrap_or(false)
    }

    /// API 키가 비어 있으면 활성 프로바이더의 환경변수에서 채움
    fn apply_env_overrides(&mut self) {
        if self.api_key.as_deref().map_or(true, str::is_empty) {
            if let Ok(key) = std::env::var(self.provider.env_key()) {
                if !key.is_empty() {
                    tracing::debug!("API key loaded from {}", self.provider.env_key());
                    self.api_key = Some(key);
                }
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// 실제 사용할 모델 이름
    pub fn effective_model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// 사용 가능한 API 키 존재 여부
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn provider(mut self, provider: ProviderType) -> Self {
        self.provider = provider;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn emoji(mut self, emoji: bool) -> Self {
        self.emoji = emoji;
        self
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn default_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = GitForgeConfig::new();
        assert_eq!(config.version, 1);
        assert_eq!(config.provider, ProviderType::Gemini);
        assert!(config.model.is_none());
        assert!(config.emoji);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_config_builder() {
        let config = GitForgeConfig::new()
            .provider(ProviderType::Openai)
            .model("gpt-4o")
            .api_key("sk-test")
            .emoji(false);

        assert_eq!(config.provider, ProviderType::Openai);
        assert_eq!(config.effective_model(), "gpt-4o");
        assert!(config.has_api_key());
        assert!(!config.emoji);
    }

    #[test]
    fn test_effective_model_fallback() {
        let config = GitForgeConfig::new();
        assert_eq!(config.effective_model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = GitForgeConfig::new()
            .provider(ProviderType::Anthropic)
            .api_key("sk-ant");
        let json = serde_json::to_string(&config).unwrap();

        let back: GitForgeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.provider, ProviderType::Anthropic);
        assert_eq!(back.api_key.as_deref(), Some("sk-ant"));
        assert!(back.emoji);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let back: GitForgeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(back.version, 1);
        assert_eq!(back.provider, ProviderType::Gemini);
        assert!(back.emoji);
    }
}
