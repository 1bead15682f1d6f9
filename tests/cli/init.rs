use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .strsyncrc.json

    ----- stderr -----
    ");

    let content = test.read_file(".strsyncrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["jsonFileName"], "strings.json");
    assert_eq!(parsed["remoteConfigParameter"], "strings");
    assert!(parsed.get("snapshot").is_none());
    assert!(content.contains("\n  \""), "Config should use 2-space indentation");

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".strsyncrc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    ✘ .strsyncrc.json already exists
    ");

    assert_eq!(test.read_file(".strsyncrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".strsyncrc.json", r#"{ "constantsTypeName": "not valid" }"#)?;

    insta::with_settings!({
        filters => vec![(r#""[^"]*\.strsyncrc\.json""#, "[CONFIG]")],
    }, {
        assert_cmd_snapshot!(test.command().args(["diff", "--tree-file", "x.json"]), @r#"
        success: false
        exit_code: 2
        ----- stdout -----

        ----- stderr -----
        Error: Invalid config file [CONFIG]: 'constantsTypeName' must be a valid identifier: "not valid"
        "#);
    });

    Ok(())
}
