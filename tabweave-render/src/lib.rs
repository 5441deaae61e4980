//! # tabweave-render
//!
//! reStructuredText to HTML rendering for tabweave.
//!
//! This crate wraps the external `rst_parser`/`rst_renderer` pair behind
//! the core's [`MarkupRenderer`] seam, so the rest of the pipeline treats
//! markup rendering as a black box.

use anyhow::{anyhow, Context, Result};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tabweave_core::MarkupRenderer;

/// Renders an `.rst` source file into a standalone HTML document.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl MarkupRenderer for HtmlRenderer {
    fn render_html(&self, source: &Path, dest: &Path) -> Result<()> {
        let mut text = fs::read_to_string(source)
            .with_context(|| format!("Failed to read {source:?}"))?;
        // The parser expects newline-terminated input.
        if !text.ends_with('\n') {
            text.push('\n');
        }

        let document = rst_parser::parse(&text)
            .map_err(|err| anyhow!("Failed to parse {source:?} as reStructuredText: {err}"))?;

        let file =
            File::create(dest).with_context(|| format!("Failed to create {dest:?}"))?;
        rst_renderer::render_html(&document, BufWriter::new(file), true)
            .map_err(|err| anyhow!("Failed to render {dest:?}: {err}"))?;

        tracing::debug!("Rendered {:?} to {:?}", source, dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn renders_a_paragraph_to_html() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("index.rst");
        let dest = dir.path().join("index.html");
        fs::write(&source, "plain paragraph text\n").unwrap();

        HtmlRenderer::new().render_html(&source, &dest).unwrap();

        let html = fs::read_to_string(&dest).unwrap();
        assert!(html.contains("plain paragraph text"));
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("absent.rst");
        let dest = dir.path().join("index.html");

        assert!(HtmlRenderer::new().render_html(&source, &dest).is_err());
    }
}
