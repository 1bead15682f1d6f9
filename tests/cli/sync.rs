use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use serde_json::json;

use crate::{CliTest, SNAPSHOT_FILE};

const EXPORTS: [&str; 3] = ["strings.json", "Localizable.strings", "Strings.swift"];

fn assert_no_exports(test: &CliTest) {
    for export in EXPORTS {
        assert!(!test.exists(export), "{} should not be written", export);
    }
}

#[test]
fn test_sync_apply_publishes_exports_and_snapshot() -> Result<()> {
    let test = CliTest::with_strings(
        &[("title", "Hello"), ("cta", "Empezá")],
        json!({ "title": "Hola" }),
    )?;

    assert_cmd_snapshot!(
        test.pipeline_command("sync")
            .args(["--apply", "--no-correct", "--skip-remote-config"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    KEY    FIGMA   GITHUB  STATE
    title  Hello   Hola    changed
    cta    Empezá  -       new

    Summary: 1 changed, 1 new
    ✓ wrote ./strings.json
    ✓ wrote ./Localizable.strings
    ✓ wrote ./Strings.swift
    ✓ published to repository (published/strings.json)

    ----- stderr -----
    "
    );

    let expected_json = "{\n  \"title\": \"Hello\",\n  \"cta\": \"Empezá\"\n}\n";
    assert_eq!(test.read_file(SNAPSHOT_FILE)?, expected_json);
    assert_eq!(test.read_file("strings.json")?, expected_json);
    assert_eq!(
        test.read_file("Localizable.strings")?,
        "\"title\" = \"Hello\";\n\"cta\" = \"Empezá\";\n"
    );
    assert_eq!(
        test.read_file("Strings.swift")?,
        "enum Strings {\n    \
         static let title = NSLocalizedString(\"title\", comment: \"\")\n    \
         static let cta = NSLocalizedString(\"cta\", comment: \"\")\n}\n"
    );

    Ok(())
}

#[test]
fn test_sync_output_dir_override() -> Result<()> {
    let test = CliTest::with_strings(&[("title", "Hello")], json!({}))?;

    assert_cmd_snapshot!(
        test.pipeline_command("sync").args([
            "--apply",
            "--no-correct",
            "--skip-remote-config",
            "--output-dir",
            "generated/ios",
        ]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    KEY    FIGMA  GITHUB  STATE
    title  Hello  -       new

    Summary: 1 new
    ✓ wrote generated/ios/strings.json
    ✓ wrote generated/ios/Localizable.strings
    ✓ wrote generated/ios/Strings.swift
    ✓ published to repository (published/strings.json)

    ----- stderr -----
    "
    );

    for export in EXPORTS {
        assert!(test.exists(&format!("generated/ios/{}", export)));
    }
    assert_no_exports(&test);

    Ok(())
}

#[test]
fn test_sync_without_apply_is_a_dry_run() -> Result<()> {
    let test = CliTest::with_strings(&[("title", "Hello")], json!({ "title": "Hola" }))?;
    let before = test.read_file(SNAPSHOT_FILE)?;

    assert_cmd_snapshot!(test.pipeline_command("sync").arg("--no-correct"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    KEY    FIGMA  GITHUB  STATE
    title  Hello  Hola    changed

    Summary: 1 changed
    Dry run: 1 label(s) would be published:
      - export ./strings.json
      - export ./Localizable.strings
      - export ./Strings.swift
      - remote config
      - repository snapshot
    Run with --apply to publish.

    ----- stderr -----
    ");

    assert_eq!(test.read_file(SNAPSHOT_FILE)?, before);
    assert_no_exports(&test);

    Ok(())
}

#[test]
fn test_sync_declined_deletion_writes_nothing() -> Result<()> {
    let test = CliTest::with_strings(&[], json!({ "old_label": "X" }))?;
    let before = test.read_file(SNAPSHOT_FILE)?;

    assert_cmd_snapshot!(
        test.pipeline_command("sync")
            .args(["--apply", "--no-correct", "--skip-remote-config"])
            .pass_stdin("no\n"),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----
    KEY        FIGMA  GITHUB  STATE
    old_label  -      X       deleted

    Summary: 1 deleted
    warning: deleting published labels needs confirmation
    1 label(s) will be deleted. Type yes to continue: ✘ Deletion of 1 label(s) not confirmed, nothing was published

    ----- stderr -----
    "
    );

    assert_eq!(test.read_file(SNAPSHOT_FILE)?, before);
    assert_no_exports(&test);

    Ok(())
}

#[test]
fn test_sync_closed_stdin_declines_deletion() -> Result<()> {
    let test = CliTest::with_strings(&[("title", "Hola")], json!({ "old_label": "X" }))?;

    assert_cmd_snapshot!(
        test.pipeline_command("sync")
            .args(["--apply", "--no-correct", "--skip-remote-config"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----
    KEY        FIGMA  GITHUB  STATE
    old_label  -      X       deleted
    title      Hola   -       new

    Summary: 1 deleted, 1 new
    warning: deleting published labels needs confirmation
    1 label(s) will be deleted. Type yes to continue: 
    ✘ Deletion of 1 label(s) not confirmed, nothing was published

    ----- stderr -----
    "
    );

    assert_no_exports(&test);

    Ok(())
}

#[test]
fn test_sync_typed_yes_confirms_deletion() -> Result<()> {
    let test = CliTest::with_strings(
        &[("title", "Hola")],
        json!({ "title": "Hola", "old_label": "X" }),
    )?;

    assert_cmd_snapshot!(
        test.pipeline_command("sync")
            .args(["--apply", "--no-correct", "--skip-remote-config"])
            .pass_stdin("yes\n"),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    KEY        FIGMA  GITHUB  STATE
    old_label  -      X       deleted

    Summary: 1 deleted
    warning: deleting published labels needs confirmation
    1 label(s) will be deleted. Type yes to continue: ✓ wrote ./strings.json
    ✓ wrote ./Localizable.strings
    ✓ wrote ./Strings.swift
    ✓ published to repository (published/strings.json)

    ----- stderr -----
    "
    );

    assert_eq!(
        test.read_file(SNAPSHOT_FILE)?,
        "{\n  \"title\": \"Hola\"\n}\n"
    );

    Ok(())
}

#[test]
fn test_sync_yes_flag_confirms_deletion() -> Result<()> {
    let test = CliTest::with_strings(&[], json!({ "old_label": "X" }))?;

    assert_cmd_snapshot!(
        test.pipeline_command("sync").args([
            "--apply",
            "--yes",
            "--no-correct",
            "--skip-remote-config",
        ]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    KEY        FIGMA  GITHUB  STATE
    old_label  -      X       deleted

    Summary: 1 deleted
    warning: deleting published labels needs confirmation
    ✓ wrote ./strings.json
    ✓ wrote ./Localizable.strings
    ✓ wrote ./Strings.swift
    ✓ published to repository (published/strings.json)

    ----- stderr -----
    "
    );

    assert_eq!(test.read_file(SNAPSHOT_FILE)?, "{}\n");
    assert_eq!(test.read_file("Strings.swift")?, "enum Strings {\n}\n");
    assert_eq!(test.read_file("Localizable.strings")?, "");

    Ok(())
}

#[test]
fn test_sync_blocked_writes_nothing() -> Result<()> {
    let test = CliTest::with_strings(&[("btn_ok", "OK"), ("btn_ok", "Okay")], json!({}))?;

    assert_cmd_snapshot!(
        test.pipeline_command("sync").args([
            "--apply",
            "--yes",
            "--no-correct",
            "--skip-remote-config",
        ]),
        @r#"
    success: false
    exit_code: 1
    ----- stdout -----
    warning: label "btn_ok" has 2 different texts: "OK", "Okay"

    KEY     FIGMA  GITHUB  STATE
    btn_ok  OK     -       identical keys
    btn_ok  Okay   -       identical keys

    ✘ Sync blocked: 2 row(s) must be fixed in the design (labels must match ^[a-z0-9_]+$)

    ----- stderr -----
    "#
    );

    assert_eq!(test.read_file(SNAPSHOT_FILE)?, "{}");
    assert_no_exports(&test);
    assert!(test.exists("string_conflicts.log"));

    Ok(())
}

#[test]
fn test_sync_up_to_date_publishes_nothing() -> Result<()> {
    let test = CliTest::with_strings(&[("title", "Hola")], json!({ "title": "Hola" }))?;

    assert_cmd_snapshot!(
        test.pipeline_command("sync")
            .args(["--apply", "--no-correct", "--skip-remote-config"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Strings are up to date

    ----- stderr -----
    "
    );

    assert_no_exports(&test);

    Ok(())
}

#[test]
fn test_sync_first_publish_with_missing_snapshot() -> Result<()> {
    let test = CliTest::with_strings(&[("title", "Hola")], json!({}))?;
    std::fs::remove_file(test.root().join(SNAPSHOT_FILE))?;

    assert_cmd_snapshot!(
        test.pipeline_command("sync").args([
            "--apply",
            "--no-correct",
            "--skip-remote-config",
            "--allow-missing-snapshot",
        ]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    KEY    FIGMA  GITHUB  STATE
    title  Hola   -       new

    Summary: 1 new
    ✓ wrote ./strings.json
    ✓ wrote ./Localizable.strings
    ✓ wrote ./Strings.swift
    ✓ published to repository (published/strings.json)

    ----- stderr -----
    "
    );

    assert_eq!(
        test.read_file(SNAPSHOT_FILE)?,
        "{\n  \"title\": \"Hola\"\n}\n"
    );

    Ok(())
}

#[test]
fn test_sync_requires_correction_key_unless_skipped() -> Result<()> {
    let test = CliTest::with_strings(&[("title", "Hello")], json!({}))?;

    assert_cmd_snapshot!(test.pipeline_command("sync"), @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: capability unavailable: spelling correction (requires GEMINI_API_KEY)
    ");

    Ok(())
}

#[test]
fn test_sync_apply_requires_remote_config_credentials() -> Result<()> {
    let test = CliTest::with_strings(&[("title", "Hello")], json!({}))?;

    assert_cmd_snapshot!(
        test.pipeline_command("sync").args(["--apply", "--no-correct"]),
        @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: capability unavailable: remote config (requires FIREBASE_CREDENTIALS_JSON)
    "
    );

    assert_eq!(test.read_file(SNAPSHOT_FILE)?, "{}");
    assert_no_exports(&test);

    Ok(())
}
