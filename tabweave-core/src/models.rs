//! Data model for loaded documents, tables, and run diagnostics.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Table name to definition, in namespace order.
///
/// Keys merged from included files carry a `"<stem>/"` qualifier; root keys
/// are unqualified. `None` means the table was declared with no entries.
pub type Namespace = IndexMap<String, Option<TableDef>>;

/// One two-column table: ordered rows plus the re-sort directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDef {
    /// Row key to row value, in source order.
    pub rows: IndexMap<String, String>,

    /// Alphabetize rows by normalized key instead of keeping source order.
    pub resort: bool,
}

/// Find/replace rules grouped by scope.
///
/// Rules are kept as ordered (pattern, replacement) pairs so that the
/// sequential application order is explicit: rule N sees the output of
/// rule N-1, including text a previous replacement introduced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroSet {
    /// Rules applied in every scope.
    pub everywhere: Vec<(String, String)>,

    /// Scope-specific rules, layered on top of `everywhere`.
    pub scopes: IndexMap<String, Vec<(String, String)>>,
}

/// One block of the composed index document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub anchor: Option<String>,

    #[serde(default)]
    pub contents: Option<String>,

    /// Hidden sections contribute their contents without heading scaffolding.
    #[serde(default)]
    pub hidden: bool,
}

/// A fully loaded root document with all includes merged in.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub macros: MacroSet,
    pub sections: Vec<Section>,
    pub tables: Namespace,
}

/// Severity of a collected diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Warning,
    Error,
}

/// A recoverable policy violation observed during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable machine-readable code (e.g. "include.escape").
    pub code: String,

    /// Human-readable description.
    pub message: String,

    pub severity: DiagnosticSeverity,
}

/// Per-run diagnostics sink.
///
/// Passed explicitly through the loader, composer, and publisher instead of
/// accumulating in process-global state. Every entry is also emitted through
/// `tracing` so warn-and-continue behavior stays visible on the console.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it.
    pub fn warn(&mut self, code: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}: {}", code, message);
        self.entries.push(Diagnostic {
            code: code.to_string(),
            message,
            severity: DiagnosticSeverity::Warning,
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the sink, returning everything collected during the run.
    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_collect_in_order() {
        let mut diags = Diagnostics::new();
        assert!(diags.is_empty());

        diags.warn("include.escape", "first");
        diags.warn("table.reserved-name", "second");

        let entries = diags.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].code, "include.escape");
        assert_eq!(entries[1].message, "second");
        assert_eq!(diags.warning_count(), 2);
    }

    #[test]
    fn section_defaults() {
        let section: Section = serde_yaml::from_str("title: T\ncontents: C").unwrap();
        assert_eq!(section.title.as_deref(), Some("T"));
        assert_eq!(section.anchor, None);
        assert!(!section.hidden);
    }
}
