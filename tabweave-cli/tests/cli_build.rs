use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

#[test]
fn build_writes_tables_index_and_html() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("doc.yaml"),
        r#"
macros:
  everywhere: {}
sections:
  - title: Overview
    contents: hi
t1:
  k1: v1
"#,
    )?;

    Command::cargo_bin("tabweave")?
        .current_dir(dir.path())
        .args(["build", "doc.yaml", "out"])
        .assert()
        .success();

    let table = fs::read_to_string(dir.path().join("out/t1.rst"))?;
    let expected = "\
.. table::
    :widths: auto

    +----+----+
    | k1 | v1 |
    +----+----+
";
    assert_eq!(table, expected);

    let index = fs::read_to_string(dir.path().join("out/index.rst"))?;
    assert_eq!(index, "\n--------\nOverview\n--------\n\nhi");

    let html = fs::read_to_string(dir.path().join("out/index.html"))?;
    assert!(html.contains("hi"));

    Ok(())
}

#[test]
fn build_applies_macros_and_includes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("units.yaml"), "lengths:\n  m: meter\n")?;
    fs::write(
        dir.path().join("doc.yaml"),
        r#"
include:
  - units.yaml
macros:
  everywhere:
    PROJECT: tabweave
sections:
  - title: About PROJECT
    contents: PROJECT body
"#,
    )?;

    Command::cargo_bin("tabweave")?
        .current_dir(dir.path())
        .args(["build", "doc.yaml", "out"])
        .assert()
        .success();

    assert!(dir.path().join("out/units/lengths.rst").is_file());

    let index = fs::read_to_string(dir.path().join("out/index.rst"))?;
    assert!(index.contains("About tabweave"));
    assert!(index.contains("tabweave body"));

    Ok(())
}

#[test]
fn build_fails_without_macros_key() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("doc.yaml"), "sections: []\n")?;

    Command::cargo_bin("tabweave")?
        .current_dir(dir.path())
        .args(["build", "doc.yaml", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("macros"));

    assert!(!dir.path().join("out/index.rst").exists());

    Ok(())
}

#[test]
fn check_json_reports_summary() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("doc.yaml"),
        r#"
macros:
  everywhere: {}
sections:
  - title: T
    contents: C
t1:
  k1: v1
"#,
    )?;

    let assert = Command::cargo_bin("tabweave")?
        .current_dir(dir.path())
        .args(["check", "doc.yaml", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let value: Value = serde_json::from_str(&stdout)?;
    assert_eq!(value["tables"], 1);
    assert_eq!(value["sections"], 1);
    assert_eq!(value["warnings"], 0);
    assert!(value["diagnostics"].as_array().unwrap().is_empty());

    // Nothing is written by check.
    assert!(!dir.path().join("out").exists());

    Ok(())
}

#[test]
fn check_reports_incomplete_sections() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("doc.yaml"),
        r#"
macros:
  everywhere: {}
sections:
  - title: No contents here
"#,
    )?;

    Command::cargo_bin("tabweave")?
        .current_dir(dir.path())
        .args(["check", "doc.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("section.incomplete"));

    Ok(())
}
