//! Root-document loading, include merging, and reserved-key extraction.

use crate::models::{Diagnostics, Document, MacroSet, Section, TableDef};
use indexmap::IndexMap;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pseudo-key controlling row ordering inside a table definition.
pub const RESORT_KEY: &str = "__re-sort__";

const INCLUDE_KEY: &str = "include";
const MACROS_KEY: &str = "macros";
const SECTIONS_KEY: &str = "sections";
const EVERYWHERE_SCOPE: &str = "everywhere";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed YAML in {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Top level of {path:?} is not a mapping")]
    NotAMapping { path: PathBuf },

    #[error("Non-string key in {path:?}")]
    NonStringKey { path: PathBuf },

    #[error("Missing required `{key}` key in {path:?}")]
    MissingKey { key: &'static str, path: PathBuf },

    #[error("Invalid `{key}` value in {path:?}")]
    InvalidValue {
        key: &'static str,
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Table `{table}` is neither null nor a mapping")]
    InvalidTable { table: String },

    #[error("Table `{table}` has a non-string row key")]
    NonStringRowKey { table: String },

    #[error("Table `{table}` row `{row}` is not a scalar value")]
    NonScalarRow { table: String, row: String },

    #[error("Re-sort directive on table `{table}` is not a boolean")]
    InvalidResort { table: String },
}

impl Document {
    /// Load the root document at `path`, merge its includes, and extract
    /// the reserved `macros` and `sections` keys out of the namespace.
    ///
    /// Include entries that fail a policy check (extension, containment,
    /// readability) are recorded on `diags` and skipped; malformed YAML
    /// and missing reserved keys are fatal.
    pub fn from_file(path: &Path, diags: &mut Diagnostics) -> Result<Document, LoadError> {
        let root = read_mapping(path)?;
        let root_dir = document_dir(path);

        let mut include_entries: Vec<String> = Vec::new();
        let mut macros_value: Option<Value> = None;
        let mut sections_value: Option<Value> = None;
        let mut raw_tables: IndexMap<String, Value> = IndexMap::new();

        for (key, value) in root {
            let Some(key) = key.as_str().map(str::to_string) else {
                return Err(LoadError::NonStringKey {
                    path: path.to_path_buf(),
                });
            };
            match key.as_str() {
                INCLUDE_KEY => {
                    include_entries =
                        serde_yaml::from_value(value).map_err(|source| LoadError::InvalidValue {
                            key: INCLUDE_KEY,
                            path: path.to_path_buf(),
                            source,
                        })?;
                }
                MACROS_KEY => macros_value = Some(value),
                SECTIONS_KEY => sections_value = Some(value),
                _ => {
                    raw_tables.insert(key, value);
                }
            }
        }

        for entry in &include_entries {
            merge_include(root_dir, entry, &mut raw_tables, diags)?;
        }

        let macros_value = macros_value.ok_or_else(|| LoadError::MissingKey {
            key: MACROS_KEY,
            path: path.to_path_buf(),
        })?;
        let macros = parse_macros(macros_value, path)?;

        let sections_value = sections_value.ok_or_else(|| LoadError::MissingKey {
            key: SECTIONS_KEY,
            path: path.to_path_buf(),
        })?;
        let sections: Vec<Section> =
            serde_yaml::from_value(sections_value).map_err(|source| LoadError::InvalidValue {
                key: SECTIONS_KEY,
                path: path.to_path_buf(),
                source,
            })?;

        let mut tables = IndexMap::new();
        for (name, value) in raw_tables {
            let def = parse_table(&name, value)?;
            tables.insert(name, def);
        }

        Ok(Document {
            macros,
            sections,
            tables,
        })
    }
}

/// Directory the root document lives in; relative paths resolve against it.
fn document_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn read_mapping(path: &Path) -> Result<serde_yaml::Mapping, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_yaml::from_str(&contents).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(LoadError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Merge one include entry's keys into the namespace, qualified by the
/// included file's stem. Policy violations warn and skip the entry.
fn merge_include(
    root_dir: &Path,
    entry: &str,
    tables: &mut IndexMap<String, Value>,
    diags: &mut Diagnostics,
) -> Result<(), LoadError> {
    let candidate = root_dir.join(entry);

    if candidate.extension().and_then(|e| e.to_str()) != Some("yaml") {
        diags.warn(
            "include.extension",
            format!("Refusing to include `{entry}`: it does not appear to be a YAML file"),
        );
        return Ok(());
    }

    let resolved = match candidate.canonicalize() {
        Ok(resolved) => resolved,
        Err(err) => {
            diags.warn(
                "include.unreadable",
                format!("Refusing to include `{entry}`: {err}"),
            );
            return Ok(());
        }
    };

    let root_dir_resolved = root_dir.canonicalize().map_err(|source| LoadError::Read {
        path: root_dir.to_path_buf(),
        source,
    })?;
    if !resolved.starts_with(&root_dir_resolved) {
        diags.warn(
            "include.escape",
            format!("Refusing to include `{entry}`: it escapes the document directory"),
        );
        return Ok(());
    }

    let included = read_mapping(&resolved)?;
    let stem = resolved
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    for (key, value) in included {
        let Some(key) = key.as_str() else {
            return Err(LoadError::NonStringKey {
                path: resolved.clone(),
            });
        };
        // Reserved names inside an included file land here too: includes
        // do not recurse, so `<stem>/macros` is just another table.
        tables.insert(format!("{stem}/{key}"), value);
    }

    Ok(())
}

fn parse_macros(value: Value, path: &Path) -> Result<MacroSet, LoadError> {
    let mut raw: IndexMap<String, IndexMap<String, String>> =
        serde_yaml::from_value(value).map_err(|source| LoadError::InvalidValue {
            key: MACROS_KEY,
            path: path.to_path_buf(),
            source,
        })?;

    let everywhere = raw
        .shift_remove(EVERYWHERE_SCOPE)
        .ok_or_else(|| LoadError::MissingKey {
            key: "macros.everywhere",
            path: path.to_path_buf(),
        })?
        .into_iter()
        .collect();

    let scopes = raw
        .into_iter()
        .map(|(scope, rules)| (scope, rules.into_iter().collect()))
        .collect();

    Ok(MacroSet { everywhere, scopes })
}

fn parse_table(name: &str, value: Value) -> Result<Option<TableDef>, LoadError> {
    let mapping = match value {
        Value::Null => return Ok(None),
        Value::Mapping(mapping) => mapping,
        _ => {
            return Err(LoadError::InvalidTable {
                table: name.to_string(),
            })
        }
    };
    if mapping.is_empty() {
        return Ok(None);
    }

    let mut rows = IndexMap::new();
    let mut resort = false;

    for (key, value) in mapping {
        let Some(key) = key.as_str().map(str::to_string) else {
            return Err(LoadError::NonStringRowKey {
                table: name.to_string(),
            });
        };

        if key == RESORT_KEY {
            match value {
                Value::Bool(flag) => resort = flag,
                _ => {
                    return Err(LoadError::InvalidResort {
                        table: name.to_string(),
                    })
                }
            }
            continue;
        }

        let value = match value {
            Value::String(text) => text,
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            _ => {
                return Err(LoadError::NonScalarRow {
                    table: name.to_string(),
                    row: key,
                })
            }
        };
        rows.insert(key, value);
    }

    Ok(Some(TableDef { rows, resort }))
}
