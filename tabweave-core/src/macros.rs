//! Scoped macro substitution over regular-expression rules.

use crate::models::MacroSet;
use indexmap::IndexMap;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MacroError {
    #[error("Invalid macro pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("Replacement `{replacement}` for pattern `{pattern}` references unknown capture group `{group}`")]
    InvalidReplacement {
        pattern: String,
        replacement: String,
        group: String,
    },
}

/// Compiled macro rules, one effective ordered list per scope.
///
/// Rules apply sequentially: each rule runs over the output of the previous
/// one, so a later rule may rewrite text an earlier replacement introduced.
#[derive(Debug)]
pub struct MacroEngine {
    everywhere: Vec<(Regex, String)>,
    scopes: IndexMap<String, Vec<(Regex, String)>>,
}

impl MacroEngine {
    /// Compile every scope's effective rule list up front.
    ///
    /// A scope rule whose pattern matches an `everywhere` pattern replaces
    /// that entry in place; other scope rules append after the shared ones.
    pub fn compile(set: &MacroSet) -> Result<Self, MacroError> {
        let everywhere = compile_rules(&set.everywhere)?;

        let mut scopes = IndexMap::new();
        for (scope, rules) in &set.scopes {
            let merged = overlay_rules(&set.everywhere, rules);
            scopes.insert(scope.clone(), compile_rules(&merged)?);
        }

        Ok(Self { everywhere, scopes })
    }

    /// Apply the effective rules for `scope` to `text`.
    ///
    /// A scope with no rules of its own gets the `everywhere` rules alone.
    /// A pattern that matches nothing is a no-op for that rule.
    pub fn substitute(&self, text: &str, scope: &str) -> String {
        let rules = self.scopes.get(scope).unwrap_or(&self.everywhere);

        let mut output = text.to_string();
        for (regex, replacement) in rules {
            output = regex.replace_all(&output, replacement.as_str()).into_owned();
        }
        output
    }
}

/// Overlay scope rules on the shared base, preserving base ordering.
fn overlay_rules(
    base: &[(String, String)],
    overlay: &[(String, String)],
) -> Vec<(String, String)> {
    let mut merged: IndexMap<&str, &str> = base
        .iter()
        .map(|(pattern, replacement)| (pattern.as_str(), replacement.as_str()))
        .collect();

    for (pattern, replacement) in overlay {
        // An existing key keeps its position; only the replacement changes.
        merged.insert(pattern, replacement);
    }

    merged
        .into_iter()
        .map(|(pattern, replacement)| (pattern.to_string(), replacement.to_string()))
        .collect()
}

fn compile_rules(rules: &[(String, String)]) -> Result<Vec<(Regex, String)>, MacroError> {
    let mut compiled = Vec::with_capacity(rules.len());
    for (pattern, replacement) in rules {
        let regex = Regex::new(pattern).map_err(|source| MacroError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        validate_replacement(&regex, pattern, replacement)?;
        compiled.push((regex, replacement.clone()));
    }
    Ok(compiled)
}

/// Reject replacements that reference capture groups the pattern lacks.
///
/// Understands `$$` escapes, bare `$name` references (longest run of word
/// characters, per regex crate expansion rules), and braced `${name}`.
fn validate_replacement(regex: &Regex, pattern: &str, replacement: &str) -> Result<(), MacroError> {
    let bytes = replacement.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }
        if i + 1 >= bytes.len() {
            // Trailing `$` expands literally.
            break;
        }
        if bytes[i + 1] == b'$' {
            i += 2;
            continue;
        }

        let (group, next) = if bytes[i + 1] == b'{' {
            match replacement[i + 2..].find('}') {
                Some(end) => (&replacement[i + 2..i + 2 + end], i + 3 + end),
                // Unterminated brace expands literally.
                None => break,
            }
        } else {
            let rest = &replacement[i + 1..];
            let len = rest
                .bytes()
                .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
                .count();
            if len == 0 {
                // `$` followed by punctuation is literal.
                i += 1;
                continue;
            }
            (&rest[..len], i + 1 + len)
        };

        let known = match group.parse::<usize>() {
            Ok(index) => index < regex.captures_len(),
            Err(_) => regex.capture_names().flatten().any(|name| name == group),
        };
        if !known {
            return Err(MacroError::InvalidReplacement {
                pattern: pattern.to_string(),
                replacement: replacement.to_string(),
                group: group.to_string(),
            });
        }

        i = next;
    }

    Ok(())
}
