//! # gitforge-template
//!
//! Gitignore template engine for GitForge.
//!
//! ## Pipeline
//! - [`TemplateSource`]: fetches named template bodies from the GitHub
//!   gitignore index, backed by a local cache
//! - [`TemplateMerger`]: dedupes and concatenates selected templates
//! - [`FileWriter`]: append-or-overwrite output, atomic on every path

pub mod error;
pub mod merger;
pub mod source;
pub mod store;
pub mod writer;

pub use error::TemplateError;
pub use merger::TemplateMerger;
pub use source::TemplateSource;
pub use store::TemplateStore;
pub use writer::{FileWriter, WriteMode};
