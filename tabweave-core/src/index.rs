//! Index document composition from the ordered section list.

use crate::macros::MacroEngine;
use crate::models::{Diagnostics, Section};

/// Concatenate all sections, in input order, into the index document body.
///
/// Sections missing a title or contents are skipped whole. Hidden sections
/// contribute their substituted contents with no heading scaffolding.
pub fn compose_index(
    sections: &[Section],
    macros: &MacroEngine,
    diags: &mut Diagnostics,
) -> String {
    let mut output = String::new();

    for section in sections {
        let (Some(title), Some(contents)) = (section.title.as_deref(), section.contents.as_deref())
        else {
            diags.warn(
                "section.incomplete",
                "Section missing a title or contents, skipping it",
            );
            continue;
        };

        let title = macros.substitute(title, "title");
        let contents = macros.substitute(contents, "contents");

        if !section.hidden {
            // Heading rules span the longest line of the substituted title.
            let width = title
                .split('\n')
                .map(|line| line.chars().count())
                .max()
                .unwrap_or(0);
            let rule = "-".repeat(width);

            output.push('\n');

            if let Some(anchor) = section.anchor.as_deref().filter(|a| !a.is_empty()) {
                output.push_str(&format!(".. _{anchor}:"));
                output.push_str("\n\n");
            }

            output.push_str(&rule);
            output.push('\n');
            output.push_str(&title);
            output.push('\n');
            output.push_str(&rule);
            output.push_str("\n\n");
        }

        output.push_str(&contents);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MacroSet;
    use indexmap::IndexMap;

    fn no_macros() -> MacroEngine {
        MacroEngine::compile(&MacroSet::default()).unwrap()
    }

    fn section(title: &str, contents: &str) -> Section {
        Section {
            title: Some(title.to_string()),
            contents: Some(contents.to_string()),
            ..Section::default()
        }
    }

    #[test]
    fn hidden_section_emits_contents_only() {
        let mut diags = Diagnostics::new();
        let sections = [Section {
            hidden: true,
            ..section("T", "C")
        }];

        let output = compose_index(&sections, &no_macros(), &mut diags);
        assert_eq!(output, "C");
        assert!(diags.is_empty());
    }

    #[test]
    fn visible_section_emits_heading_scaffolding() {
        let mut diags = Diagnostics::new();
        let sections = [section("T", "C")];

        let output = compose_index(&sections, &no_macros(), &mut diags);
        assert_eq!(output, "\n-\nT\n-\n\nC");
    }

    #[test]
    fn anchor_emits_reference_marker_before_heading() {
        let mut diags = Diagnostics::new();
        let sections = [Section {
            anchor: Some("intro".to_string()),
            ..section("Overview", "Body text")
        }];

        let output = compose_index(&sections, &no_macros(), &mut diags);
        assert_eq!(
            output,
            "\n.. _intro:\n\n--------\nOverview\n--------\n\nBody text"
        );
    }

    #[test]
    fn empty_anchor_is_treated_as_absent() {
        let mut diags = Diagnostics::new();
        let sections = [Section {
            anchor: Some(String::new()),
            ..section("T", "C")
        }];

        let output = compose_index(&sections, &no_macros(), &mut diags);
        assert_eq!(output, "\n-\nT\n-\n\nC");
    }

    #[test]
    fn heading_rules_span_the_longest_title_line() {
        let mut diags = Diagnostics::new();
        let sections = [section("ab\nlongest line\ncd", "C")];

        let output = compose_index(&sections, &no_macros(), &mut diags);
        let rule = "-".repeat("longest line".len());
        assert!(output.starts_with(&format!("\n{rule}\nab\nlongest line\ncd\n{rule}\n\n")));
    }

    #[test]
    fn incomplete_sections_are_skipped_with_a_warning() {
        let mut diags = Diagnostics::new();
        let sections = [
            Section {
                title: Some("No contents".to_string()),
                ..Section::default()
            },
            Section {
                contents: Some("No title".to_string()),
                ..Section::default()
            },
            section("Kept", "kept contents"),
        ];

        let output = compose_index(&sections, &no_macros(), &mut diags);
        assert!(!output.contains("No title"));
        assert!(output.contains("kept contents"));
        assert_eq!(diags.warning_count(), 2);
        assert_eq!(diags.entries()[0].code, "section.incomplete");
    }

    #[test]
    fn titles_and_contents_use_their_own_scopes() {
        let mut scopes = IndexMap::new();
        scopes.insert(
            "title".to_string(),
            vec![("NAME".to_string(), "Heading".to_string())],
        );
        scopes.insert(
            "contents".to_string(),
            vec![("NAME".to_string(), "body".to_string())],
        );
        let engine = MacroEngine::compile(&MacroSet {
            everywhere: vec![],
            scopes,
        })
        .unwrap();

        let mut diags = Diagnostics::new();
        let sections = [section("NAME", "NAME")];
        let output = compose_index(&sections, &engine, &mut diags);

        assert_eq!(output, "\n-------\nHeading\n-------\n\nbody");
    }

    #[test]
    fn sections_concatenate_in_input_order() {
        let mut diags = Diagnostics::new();
        let sections = [
            Section {
                hidden: true,
                ..section("A", "first")
            },
            Section {
                hidden: true,
                ..section("B", "second")
            },
        ];

        let output = compose_index(&sections, &no_macros(), &mut diags);
        assert_eq!(output, "firstsecond");
    }
}
