//! gitignore 명령 흐름 (list / generate)

use crate::select::{self, SelectionOutcome};
use gitforge_foundation::{Error, Result};
use gitforge_template::{FileWriter, TemplateMerger, TemplateSource, TemplateStore, WriteMode};
use std::path::Path;

/// `gitforge list [--cached]`
pub async fn list(cached: bool) -> Result<()> {
    let source = TemplateSource::new(TemplateStore::global()?);

    let names = if cached {
        source.list_cached()
    } else {
        println!("Fetching available templates...");
        source.list_available().await?
    };

    if names.is_empty() {
        println!("No templates found.");
        return Ok(());
    }

    println!("{}", names.join(", "));
    Ok(())
}

/// `gitforge generate [TEMPLATES]...`
pub async fn generate(
    templates: Vec<String>,
    output: &Path,
    mode: WriteMode,
    offline: bool,
) -> Result<()> {
    let source = TemplateSource::new(TemplateStore::global()?).with_offline(offline);

    let selection = if templates.is_empty() {
        let available = if offline {
            source.list_cached()
        } else {
            println!("Fetching available templates...");
            source.list_available().await?
        };

        if available.is_empty() {
            return Err(Error::Template(
                "no templates available to choose from".to_string(),
            ));
        }

        match select::pick_templates(&available)? {
            SelectionOutcome::Cancelled => {
                println!("Cancelled by user");
                return Err(Error::Cancelled);
            }
            SelectionOutcome::Selected(names) => names,
        }
    } else {
        templates
    };

    if selection.is_empty() {
        println!("No templates selected.");
        return Ok(());
    }

    let merged = TemplateMerger::new(&source).merge(&selection).await?;
    FileWriter::write(output, &merged, mode)?;

    println!("✓ Wrote {}", output.display());
    Ok(())
}
