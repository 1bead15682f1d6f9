use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use serde_json::json;

use crate::{CliTest, SNAPSHOT_FILE};

#[test]
fn test_diff_new_label() -> Result<()> {
    let test = CliTest::with_strings(&[("title", "Hello")], json!({}))?;

    assert_cmd_snapshot!(test.pipeline_command("diff"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    KEY    FIGMA  GITHUB  STATE
    title  Hello  -       new

    Summary: 1 new

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_diff_changed_label() -> Result<()> {
    let test = CliTest::with_strings(&[("title", "Hello")], json!({ "title": "Hola" }))?;

    assert_cmd_snapshot!(test.pipeline_command("diff"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    KEY    FIGMA  GITHUB  STATE
    title  Hello  Hola    changed

    Summary: 1 changed

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_diff_invalid_label_blocks() -> Result<()> {
    let test = CliTest::with_strings(&[("Title", "Hi")], json!({}))?;

    assert_cmd_snapshot!(test.pipeline_command("diff"), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    KEY    FIGMA  GITHUB        STATE
    Title  Hi     invalid name  invalid key

    ✘ Sync blocked: 1 row(s) must be fixed in the design (labels must match ^[a-z0-9_]+$)

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_diff_identical_keys_block() -> Result<()> {
    let test = CliTest::with_strings(&[("btn_ok", "OK"), ("btn_ok", "Okay")], json!({}))?;

    assert_cmd_snapshot!(test.pipeline_command("diff"), @r#"
    success: false
    exit_code: 1
    ----- stdout -----
    warning: label "btn_ok" has 2 different texts: "OK", "Okay"

    KEY     FIGMA  GITHUB  STATE
    btn_ok  OK     -       identical keys
    btn_ok  Okay   -       identical keys

    ✘ Sync blocked: 2 row(s) must be fixed in the design (labels must match ^[a-z0-9_]+$)

    ----- stderr -----
    "#);

    assert_eq!(
        test.read_file("string_conflicts.log")?,
        "btn_ok:\n    - \"OK\"\n    - \"Okay\"\n"
    );

    Ok(())
}

#[test]
fn test_diff_deleted_label_needs_confirmation() -> Result<()> {
    let test = CliTest::with_strings(&[], json!({ "old_label": "X" }))?;

    assert_cmd_snapshot!(test.pipeline_command("diff"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    KEY        FIGMA  GITHUB  STATE
    old_label  -      X       deleted

    Summary: 1 deleted
    warning: deleting published labels needs confirmation

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_diff_up_to_date() -> Result<()> {
    let test = CliTest::with_strings(&[("title", "Hola")], json!({ "title": "Hola" }))?;

    assert_cmd_snapshot!(test.pipeline_command("diff"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Strings are up to date

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_diff_never_writes_the_snapshot() -> Result<()> {
    let test = CliTest::with_strings(&[("title", "Hello")], json!({ "title": "Hola" }))?;
    let before = test.read_file(SNAPSHOT_FILE)?;

    test.pipeline_command("diff").output()?;

    assert_eq!(test.read_file(SNAPSHOT_FILE)?, before);
    assert!(!test.exists("strings.json"));

    Ok(())
}

#[test]
fn test_diff_missing_snapshot_fails() -> Result<()> {
    let test = CliTest::with_strings(&[("title", "Hello")], json!({}))?;
    std::fs::remove_file(test.root().join(SNAPSHOT_FILE))?;

    assert_cmd_snapshot!(test.pipeline_command("diff"), @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: failed to load the snapshot from published/strings.json: published/strings.json: No such file or directory (os error 2)
    ");

    Ok(())
}

#[test]
fn test_diff_missing_snapshot_allowed_starts_empty() -> Result<()> {
    let test = CliTest::with_strings(&[("title", "Hello")], json!({}))?;
    std::fs::remove_file(test.root().join(SNAPSHOT_FILE))?;

    assert_cmd_snapshot!(test.pipeline_command("diff").arg("--allow-missing-snapshot"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    KEY    FIGMA  GITHUB  STATE
    title  Hello  -       new

    Summary: 1 new

    ----- stderr -----
    ");

    assert!(!test.exists(SNAPSHOT_FILE));

    Ok(())
}
