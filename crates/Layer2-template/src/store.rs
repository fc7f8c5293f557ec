//! Template body cache
//!
//! 템플릿 본문을 파일 단위로 캐시 (<cache dir>/gitforge/templates/<Name>.gitignore)

use crate::error::TemplateError;
use std::path::{Path, PathBuf};

const TEMPLATE_EXTENSION: &str = "gitignore";

/// On-disk cache of template bodies, one file per template
#[derive(Debug, Clone)]
pub struct TemplateStore {
    base_dir: PathBuf,
}

impl TemplateStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// 글로벌 캐시 (<cache dir>/gitforge/templates/)
    pub fn global() -> Result<Self, TemplateError> {
        let dir = dirs::cache_dir()
            .ok_or_else(|| {
                TemplateError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "cannot find user cache directory",
                ))
            })?
            .join("gitforge")
            .join("templates");
        Ok(Self::new(dir))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{name}.{TEMPLATE_EXTENSION}"))
    }

    fn ensure_dir(&self) -> Result<(), TemplateError> {
        if !self.base_dir.exists() {
            std::fs::create_dir_all(&self.base_dir)?;
        }
        Ok(())
    }

    /// Cached body for a template, None when absent or unreadable
    pub fn get(&self, name: &str) -> Option<String> {
        std::fs::read_to_string(self.file_path(name)).ok()
    }

    /// Cache a template body
    pub fn put(&self, name: &str, body: &str) -> Result<(), TemplateError> {
        self.ensure_dir()?;
        std::fs::write(self.file_path(name), body)?;
        Ok(())
    }

    /// Sorted names of all cached templates
    ///
    /// Unreadable entries are skipped, a missing cache directory is empty.
    pub fn list(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.base_dir) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .map(|ext| ext == TEMPLATE_EXTENSION)
                    .unwrap_or(false)
            })
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(|s| s.to_string())
            })
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::new(dir.path());

        store.put("Python", "__pycache__/\n*.pyc\n").unwrap();
        assert_eq!(
            store.get("Python").as_deref(),
            Some("__pycache__/\n*.pyc\n")
        );
    }

    #[test]
    fn test_get_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::new(dir.path());
        assert!(store.get("Node").is_none());
    }

    #[test]
    fn test_list_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::new(dir.path());

        store.put("Rust", "target/\n").unwrap();
        store.put("Node", "node_modules/\n").unwrap();
        store.put("Python", "*.pyc\n").unwrap();

        assert_eq!(store.list(), vec!["Node", "Python", "Rust"]);
    }

    #[test]
    fn test_list_skips_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::new(dir.path());

        store.put("Go", "bin/\n").unwrap();
        std::fs::write(dir.path().join("README.md"), "not a template").unwrap();

        assert_eq!(store.list(), vec!["Go"]);
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let store = TemplateStore::new("/nonexistent/gitforge/templates");
        assert!(store.list().is_empty());
    }
}
