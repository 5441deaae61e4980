//! # tabweave-core
//!
//! Core library for the tabweave reference-document generator.
//!
//! This crate turns a declarative YAML document into reStructuredText
//! artifacts: it merges included files into one namespace, applies scoped
//! regex macros, renders two-column grid tables, and composes the section
//! index that an external renderer turns into HTML.

pub mod index;
pub mod loader;
pub mod macros;
pub mod models;
pub mod publish;
pub mod table;

pub use index::compose_index;
pub use loader::{LoadError, RESORT_KEY};
pub use macros::{MacroEngine, MacroError};
pub use models::{
    Diagnostic, DiagnosticSeverity, Diagnostics, Document, MacroSet, Namespace, Section, TableDef,
};
pub use publish::{MarkupRenderer, PublishError, Publisher, INDEX_STEM};
pub use table::render_table;
