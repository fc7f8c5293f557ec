//! Config - 통합 설정 관리
//!
//! - `settings.rs` - GitForgeConfig (프로바이더, 모델, API 키, 이모지)
//! - `provider_type.rs` - ProviderType (지원 프로바이더)

mod provider_type;
mod settings;

pub use provider_type::ProviderType;
pub use settings::{GitForgeConfig, GITFORGE_CONFIG_FILE};
