//! Output file writer
//!
//! 병합 결과를 대상 파일에 기록 (임시 파일 경유, 원자적 교체)

use crate::error::TemplateError;
use std::io::Write as _;
use std::path::Path;

/// Write behavior for the target file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Keep existing content, separated from the new block by one blank line
    Append,
    /// Replace file contents entirely
    Overwrite,
}

/// Atomic writer for generated gitignore content
pub struct FileWriter;

impl FileWriter {
    /// Write content to path according to mode
    ///
    /// The full new contents are assembled in memory and written to a
    /// temporary file in the target directory, then persisted over the
    /// target. The target never ends up partially written.
    pub fn write(path: &Path, content: &str, mode: WriteMode) -> Result<(), TemplateError> {
        let merged = match mode {
            WriteMode::Append => match read_existing(path)? {
                Some(existing) if !existing.trim().is_empty() => {
                    format!("{}\n\n{}", existing.trim_end(), content)
                }
                _ => content.to_string(),
            },
            WriteMode::Overwrite => content.to_string(),
        };

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(merged.as_bytes())?;
        tmp.persist(path).map_err(|e| TemplateError::Io(e.error))?;

        Ok(())
    }
}

fn read_existing(path: &Path) -> Result<Option<String>, TemplateError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(TemplateError::Io(e)),
    }
}
