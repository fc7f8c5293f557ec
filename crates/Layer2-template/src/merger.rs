//! Template merge logic
//!
//! 선택된 템플릿을 하나의 gitignore 문서로 병합

use crate::{error::TemplateError, source::TemplateSource};

/// Merges selected templates into a single document
pub struct TemplateMerger<'a> {
    source: &'a TemplateSource,
}

impl<'a> TemplateMerger<'a> {
    pub fn new(source: &'a TemplateSource) -> Self {
        Self { source }
    }

    /// Merge the named templates, in order, into one gitignore document
    ///
    /// Duplicates keep their first position. Every body is resolved before
    /// any output is assembled, so an unknown name produces no partial
    /// document. Each section starts with a `### <Name> ###` header and
    /// sections are separated by exactly one blank line.
    pub async fn merge(&self, names: &[String]) -> Result<String, TemplateError> {
        let names = dedupe(names);
        if names.is_empty() {
            return Ok(String::new());
        }

        let mut resolved = Vec::with_capacity(names.len());
        for name in &names {
            let body = self.source.fetch_body(name).await?;
            resolved.push((name.as_str(), body));
        }

        let sections: Vec<String> = resolved
            .iter()
            .map(|(name, body)| format!("### {} ###\n{}", name, body.trim()))
            .collect();

        Ok(format!("{}\n", sections.join("\n\n")))
    }
}

/// First occurrence wins, order preserved
fn dedupe(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TemplateStore;

    fn offline_source(dir: &std::path::Path) -> TemplateSource {
        let store = TemplateStore::new(dir);
        store.put("Python", "__pycache__/\n*.pyc\n").unwrap();
        store.put("Node", "node_modules/\n").unwrap();
        TemplateSource::new(store).with_offline(true)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_merge_headers_order_and_separator() {
        let dir = tempfile::tempdir().unwrap();
        let source = offline_source(dir.path());
        let merger = TemplateMerger::new(&source);

        let merged = merger.merge(&names(&["Python", "Node"])).await.unwrap();
        assert_eq!(
            merged,
            "### Python ###\n__pycache__/\n*.pyc\n\n### Node ###\nnode_modules/\n"
        );
    }

    #[tokio::test]
    async fn test_merge_respects_selection_order() {
        let dir = tempfile::tempdir().unwrap();
        let source = offline_source(dir.path());
        let merger = TemplateMerger::new(&source);

        let merged = merger.merge(&names(&["Node", "Python"])).await.unwrap();
        let node_at = merged.find("### Node ###").unwrap();
        let python_at = merged.find("### Python ###").unwrap();
        assert!(node_at < python_at);
    }

    #[tokio::test]
    async fn test_merge_dedupes_preserving_first() {
        let dir = tempfile::tempdir().unwrap();
        let source = offline_source(dir.path());
        let merger = TemplateMerger::new(&source);

        let merged = merger
            .merge(&names(&["Python", "Node", "Python"]))
            .await
            .unwrap();
        assert_eq!(merged.matches("### Python ###").count(), 1);
        assert_eq!(merged.matches("### Node ###").count(), 1);
    }

    #[tokio::test]
    async fn test_merge_unknown_name_fails_before_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = offline_source(dir.path());
        let merger = TemplateMerger::new(&source);

        let err = merger
            .merge(&names(&["Python", "Zig"]))
            .await
            .unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(name) if name == "Zig"));
    }

    #[tokio::test]
    async fn test_merge_empty_selection() {
        let dir = tempfile::tempdir().unwrap();
        let source = offline_source(dir.path());
        let merger = TemplateMerger::new(&source);

        assert_eq!(merger.merge(&[]).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_merge_single_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let source = offline_source(dir.path());
        let merger = TemplateMerger::new(&source);

        let merged = merger.merge(&names(&["Python"])).await.unwrap();
        assert!(merged.ends_with('\n'));
        assert!(!merged.ends_with("\n\n"));
    }
}
