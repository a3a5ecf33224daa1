use anyhow::{Context, Result};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["sourceRoot"], "./public");
    assert_eq!(parsed["poRoot"], "./po");
    assert_eq!(parsed["translationFunction"], "__");
    assert!(parsed["copyFiles"].is_array());

    // 2-space indentation
    assert!(content.contains("\n  \"sourceRoot\""));

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["init"])?;

    assert_eq!(output.code, Some(0));
    assert_eq!(output.stdout, "✓ Created .poglotrc.json\n");
    let content = test.read_file(".poglotrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".poglotrc.json", "{}")?;

    let output = test.run(&["init"])?;

    assert_eq!(output.code, Some(1));
    assert_eq!(output.stderr, "error: .poglotrc.json already exists\n");
    assert_eq!(test.read_file(".poglotrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::with_project()?;
    assert_eq!(test.run(&["init"])?.code, Some(0));

    let output = test.run(&["build"])?;

    assert_eq!(
        output.code,
        Some(0),
        "Build should work with initialized config. stderr: {}",
        output.stderr
    );

    Ok(())
}

#[test]
fn test_help_lists_commands() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["--help"])?;

    assert_eq!(output.code, Some(0));
    for command in ["build", "extract", "merge", "init", "serve"] {
        assert!(output.stdout.contains(command), "missing {}", command);
    }

    Ok(())
}
