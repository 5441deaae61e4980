//! Artifact publishing: per-table files, the composed index, rendered HTML.

use crate::index::compose_index;
use crate::macros::MacroEngine;
use crate::models::{Diagnostics, Document};
use crate::table::render_table;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Output stem reserved for the composed index artifact.
pub const INDEX_STEM: &str = "index";

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Failed to write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render {path:?} to HTML")]
    Render {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// Converts a markup document on disk into a rendered output document.
///
/// Implemented outside the core so the core never links a specific
/// renderer; tests substitute lightweight stubs.
pub trait MarkupRenderer {
    fn render_html(&self, source: &Path, dest: &Path) -> anyhow::Result<()>;
}

/// Writes all artifacts for one processing run into a single output
/// directory, overwriting whatever is already there.
pub struct Publisher<R> {
    output_dir: PathBuf,
    renderer: R,
}

impl<R: MarkupRenderer> Publisher<R> {
    pub fn new(output_dir: impl Into<PathBuf>, renderer: R) -> Self {
        Self {
            output_dir: output_dir.into(),
            renderer,
        }
    }

    /// Write one `.rst` artifact per table in namespace order, then the
    /// composed `index.rst`, then hand the index to the renderer for
    /// `index.html`. File-system and renderer failures are fatal.
    pub fn publish(
        &self,
        doc: &Document,
        macros: &MacroEngine,
        diags: &mut Diagnostics,
    ) -> Result<(), PublishError> {
        for (name, def) in &doc.tables {
            if name == INDEX_STEM {
                diags.warn(
                    "table.reserved-name",
                    format!("Skipping table `{name}`: it would overwrite the generated index"),
                );
                continue;
            }

            let dest = self.output_dir.join(format!("{name}.rst"));
            if !is_contained(&dest, &self.output_dir) {
                // Logged but not enforced; the write below still happens.
                diags.warn(
                    "table.escape",
                    format!("Destination for table `{name}` escapes the output directory"),
                );
            }

            write_artifact(&dest, &render_table(name, def.as_ref(), macros))?;
        }

        let index_path = self.output_dir.join("index.rst");
        write_artifact(&index_path, &compose_index(&doc.sections, macros, diags))?;

        let html_path = self.output_dir.join("index.html");
        self.renderer
            .render_html(&index_path, &html_path)
            .map_err(|source| PublishError::Render {
                path: index_path,
                source,
            })?;

        Ok(())
    }
}

fn write_artifact(dest: &Path, contents: &str) -> Result<(), PublishError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|source| PublishError::Write {
            path: dest.to_path_buf(),
            source,
        })?;
    }
    fs::write(dest, contents).map_err(|source| PublishError::Write {
        path: dest.to_path_buf(),
        source,
    })
}

fn is_contained(dest: &Path, dir: &Path) -> bool {
    lexical_normalize(dest).starts_with(lexical_normalize(dir))
}

/// Resolve `.` and `..` components without touching the filesystem; the
/// destination does not exist yet when the containment check runs.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
