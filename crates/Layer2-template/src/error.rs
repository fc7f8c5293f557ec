//! Template engine error types

use gitforge_foundation::Error as FoundationError;
use thiserror::Error;

/// Errors from the template source, cache, and writer
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Failed to fetch templates: {0}")]
    Fetch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Conversions
// ============================================================================

impl From<TemplateError> for FoundationError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::NotFound(name) => FoundationError::TemplateNotFound(name),
            TemplateError::Fetch(msg) => FoundationError::Template(msg),
            TemplateError::Io(e) => FoundationError::Io(e),
        }
    }
}
