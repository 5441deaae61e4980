//! Two-column RST grid-table rendering.

use crate::macros::MacroEngine;
use crate::models::TableDef;
use regex::Regex;
use std::sync::OnceLock;

static NON_WORD_REGEX: OnceLock<Regex> = OnceLock::new();

fn non_word_regex() -> &'static Regex {
    NON_WORD_REGEX.get_or_init(|| Regex::new(r"\W+").unwrap())
}

/// Normalized sort key: strip everything that is not a letter, digit, or
/// underscore. Keys compare case-sensitively by code point.
fn sort_key(key: &str) -> String {
    non_word_regex().replace_all(key, "").into_owned()
}

/// Render one named table definition as an indented `.. table::` block.
///
/// A definition with no entries produces a placeholder paragraph instead of
/// an empty table. Row keys pass through macro scope `"left"`, row values
/// through scope `"right"`. When `resort` is set, rows are ordered by the
/// normalized form of the raw key, before substitution.
pub fn render_table(name: &str, def: Option<&TableDef>, macros: &MacroEngine) -> String {
    let Some(def) = def else {
        return format!("\n**Table <{name}> has no entries**\n");
    };

    let mut keys: Vec<&String> = def.rows.keys().collect();
    if def.resort {
        // Stable, so equal normalized keys keep their source order.
        keys.sort_by_cached_key(|key| sort_key(key));
    }

    let rows: Vec<(String, String)> = keys
        .into_iter()
        .map(|key| {
            (
                macros.substitute(key, "left"),
                macros.substitute(&def.rows[key], "right"),
            )
        })
        .collect();

    let mut output = String::from(".. table::\n    :widths: auto\n\n");
    for line in grid_lines(&rows) {
        output.push_str("    ");
        output.push_str(&line);
        output.push('\n');
    }
    output
}

/// Lay out rows as a header-less two-column grid with a rule line around
/// and between every row. Cells may span multiple lines; the row grows to
/// its tallest cell.
fn grid_lines(rows: &[(String, String)]) -> Vec<String> {
    let cells: Vec<(Vec<&str>, Vec<&str>)> = rows
        .iter()
        .map(|(left, right)| (left.split('\n').collect(), right.split('\n').collect()))
        .collect();

    let mut left_width = 1;
    let mut right_width = 1;
    for (left, right) in &cells {
        for line in left {
            left_width = left_width.max(line.chars().count());
        }
        for line in right {
            right_width = right_width.max(line.chars().count());
        }
    }

    let rule = format!(
        "+{}+{}+",
        "-".repeat(left_width + 2),
        "-".repeat(right_width + 2)
    );

    let mut lines = vec![rule.clone()];
    for (left, right) in &cells {
        let height = left.len().max(right.len());
        for i in 0..height {
            let l = left.get(i).copied().unwrap_or("");
            let r = right.get(i).copied().unwrap_or("");
            lines.push(format!(
                "| {:<lw$} | {:<rw$} |",
                l,
                r,
                lw = left_width,
                rw = right_width
            ));
        }
        lines.push(rule.clone());
    }
    lines
}
