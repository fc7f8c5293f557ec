//! # gitforge-foundation
//!
//! Foundation layer for GitForge:
//! - Error: 중앙 에러 타입 (Error, Result)
//! - Config: 통합 설정 (GitForgeConfig, ProviderType)
//! - Storage: JsonStore (범용 JSON 저장/로드)
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  CLI (list / generate / commit / config)    │
//! │          │                    │             │
//! │          ▼                    ▼             │
//! │   Template Engine      Provider Gateway     │
//! │   (source→merge→write) (retry + backoff)    │
//! │          │                    │             │
//! │          └────────┬───────────┘             │
//! │                   ▼                         │
//! │     Foundation (Error, Config, JsonStore)   │
//! └─────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{GitForgeConfig, ProviderType, GITFORGE_CONFIG_FILE};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::JsonStore;
