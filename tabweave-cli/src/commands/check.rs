//! Check command: validate a document and surface diagnostics without
//! writing any output.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tabweave_core::{compose_index, Diagnostic, Diagnostics, Document, MacroEngine, INDEX_STEM};

#[derive(Serialize)]
struct CheckSummary<'a> {
    tables: usize,
    sections: usize,
    warnings: usize,
    diagnostics: &'a [Diagnostic],
}

/// Load and compile the document, dry-run the compositions that can emit
/// policy warnings, and print a summary as text or JSON.
pub fn check_document(input: &Path, json: bool) -> Result<()> {
    let mut diags = Diagnostics::new();
    let doc = Document::from_file(input, &mut diags).context("Failed to load document")?;
    let macros = MacroEngine::compile(&doc.macros).context("Failed to compile macro rules")?;

    let _ = compose_index(&doc.sections, &macros, &mut diags);
    for name in doc.tables.keys() {
        if name == INDEX_STEM {
            diags.warn(
                "table.reserved-name",
                format!("Table `{name}` would be skipped: it collides with the generated index"),
            );
        }
    }

    let summary = CheckSummary {
        tables: doc.tables.len(),
        sections: doc.sections.len(),
        warnings: diags.warning_count(),
        diagnostics: diags.entries(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Check complete: {} tables, {} sections, {} warnings",
            summary.tables, summary.sections, summary.warnings
        );
        for diag in diags.entries() {
            println!("- {} {}", diag.code, diag.message);
        }
    }

    Ok(())
}
