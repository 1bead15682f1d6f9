use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use serde_json::json;

use crate::{CliTest, TREE_FILE};

#[test]
fn test_extract_prints_grouped_texts() -> Result<()> {
    let test = CliTest::with_strings(&[("title", "Hola"), ("cta", "Empezar")], json!({}))?;

    assert_cmd_snapshot!(test.command().args(["extract", "--tree-file", TREE_FILE]), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {
      "title": "Hola",
      "cta": "Empezar"
    }

    ✓ Extracted 2 label(s), 0 with conflicting texts

    ----- stderr -----
    "#);

    assert!(!test.exists("string_conflicts.log"));

    Ok(())
}

#[test]
fn test_extract_raw_keeps_every_value() -> Result<()> {
    let test = CliTest::with_strings(&[("btn_ok", "OK"), ("btn_ok", "Okay")], json!({}))?;

    assert_cmd_snapshot!(
        test.command().args(["extract", "--raw", "--tree-file", TREE_FILE]),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {
      "btn_ok": [
        "OK",
        "Okay"
      ]
    }

    warning: label "btn_ok" has 2 different texts: "OK", "Okay"

    ✓ Extracted 1 label(s), 1 with conflicting texts

    ----- stderr -----
    "#
    );

    Ok(())
}

#[test]
fn test_extract_writes_conflict_log() -> Result<()> {
    let test = CliTest::with_strings(
        &[("btn_ok", "Okay"), ("title", "Hola"), ("btn_ok", "OK")],
        json!({}),
    )?;

    assert_cmd_snapshot!(test.command().args(["extract", "--tree-file", TREE_FILE]), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {
      "btn_ok": "Okay",
      "title": "Hola"
    }

    warning: label "btn_ok" has 2 different texts: "OK", "Okay"

    ✓ Extracted 2 label(s), 1 with conflicting texts

    ----- stderr -----
    "#);

    assert_eq!(
        test.read_file("string_conflicts.log")?,
        "btn_ok:\n    - \"OK\"\n    - \"Okay\"\n"
    );

    Ok(())
}

#[test]
fn test_extract_output_saves_original_snapshot() -> Result<()> {
    let test = CliTest::with_strings(&[("title", "Canción")], json!({}))?;

    assert_cmd_snapshot!(
        test.command().args([
            "extract",
            "--tree-file",
            TREE_FILE,
            "--output",
            "strings-original.json",
        ]),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {
      "title": "Canción"
    }

    ✓ saved strings-original.json
    ✓ Extracted 1 label(s), 0 with conflicting texts

    ----- stderr -----
    "#
    );

    assert_eq!(
        test.read_file("strings-original.json")?,
        "{\n  \"title\": \"Canción\"\n}\n"
    );

    Ok(())
}

#[test]
fn test_extract_without_tree_source_fails() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("extract"), @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: capability unavailable: tree source (requires FIGMA_TOKEN and figmaFileKey, or --tree-file)
    ");

    Ok(())
}

#[test]
fn test_extract_from_missing_file_fails() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().args(["extract", "--tree-file", "missing.json"]), @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: failed to fetch the design tree from missing.json: missing.json: No such file or directory (os error 2)
    ");

    Ok(())
}
