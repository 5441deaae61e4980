//! Build command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tabweave_core::{Diagnostics, Document, MacroEngine, Publisher};
use tabweave_render::HtmlRenderer;

/// Full processing pass: load the document, compile the macro set, and
/// publish every artifact into the output directory.
pub fn build_document(input: &Path, output: &Path) -> Result<()> {
    tracing::info!("Loading document from {:?}", input);

    let mut diags = Diagnostics::new();
    let doc = Document::from_file(input, &mut diags).context("Failed to load document")?;
    let macros = MacroEngine::compile(&doc.macros).context("Failed to compile macro rules")?;

    tracing::info!(
        "Publishing {} tables and {} sections",
        doc.tables.len(),
        doc.sections.len()
    );

    Publisher::new(output, HtmlRenderer::new())
        .publish(&doc, &macros, &mut diags)
        .context("Failed to publish artifacts")?;

    if diags.is_empty() {
        tracing::info!("✓ Output written to {:?}", output);
    } else {
        tracing::warn!(
            "Output written to {:?} with {} warnings",
            output,
            diags.warning_count()
        );
    }

    Ok(())
}
