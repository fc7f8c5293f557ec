//! Remote template index client
//!
//! GitHub gitignore API 기반, 로컬 캐시 우선 조회

use crate::{error::TemplateError, store::TemplateStore};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.github.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
// GitHub rejects requests without a User-Agent.
const USER_AGENT: &str = concat!("gitforge/", env!("CARGO_PKG_VERSION"));
const ACCEPT_HEADER: &str = "application/vnd.github+json";

/// Template index client with cache-first body resolution
pub struct TemplateSource {
    client: reqwest::Client,
    store: TemplateStore,
    base_url: String,
    offline: bool,
}

impl TemplateSource {
    pub fn new(store: TemplateStore) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            store,
            base_url: DEFAULT_BASE_URL.to_string(),
            offline: false,
        }
    }

    /// Override the API base URL (tests, mirrors)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Answer every query from the local cache, never touching the network
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    fn templates_url(&self) -> String {
        format!("{}/gitignore/templates", self.base_url)
    }

    fn template_url(&self, name: &str) -> String {
        format!("{}/gitignore/templates/{}", self.base_url, name)
    }

    /// Names known to the remote index, in index order
    ///
    /// Offline mode answers from the cache instead.
    pub async fn list_available(&self) -> Result<Vec<String>, TemplateError> {
        if self.offline {
            return Ok(self.store.list());
        }

        let response = self
            .client
            .get(self.templates_url())
            .header("Accept", ACCEPT_HEADER)
            .send()
            .await
            .map_err(|e| TemplateError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TemplateError::Fetch(format!(
                "template index returned HTTP {}",
                response.status()
            )));
        }

        response
            .json::<Vec<String>>()
            .await
            .map_err(|e| TemplateError::Fetch(e.to_string()))
    }

    /// Names available in the local cache
    pub fn list_cached(&self) -> Vec<String> {
        self.store.list()
    }

    /// Body for a named template
    ///
    /// Explicit two-step lookup: check the local store, else fetch from the
    /// remote index and store the body before returning it.
    pub async fn fetch_body(&self, name: &str) -> Result<String, TemplateError> {
        if let Some(body) = self.store.get(name) {
            tracing::debug!("Template '{}' served from cache", name);
            return Ok(body);
        }

        if self.offline {
            return Err(TemplateError::NotFound(name.to_string()));
        }

        let response = self
            .client
            .get(self.template_url(name))
            .header("Accept", ACCEPT_HEADER)
            .send()
            .await
            .map_err(|e| TemplateError::Fetch(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(TemplateError::NotFound(name.to_string()));
        }
        if !response.status().is_success() {
            return Err(TemplateError::Fetch(format!(
                "template fetch returned HTTP {}",
                response.status()
            )));
        }

        let template: RemoteTemplate = response
            .json()
            .await
            .map_err(|e| TemplateError::Fetch(e.to_string()))?;

        if let Err(e) = self.store.put(name, &template.source) {
            tracing::warn!("Failed to cache template '{}': {}", name, e);
        }

        Ok(template.source)
    }
}

// ============================================================================
// GitHub API Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct RemoteTemplate {
    source: String,
}
