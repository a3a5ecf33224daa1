use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::CliTest;

#[test]
fn test_build_writes_localized_files() -> Result<()> {
    let test = CliTest::with_project()?;

    let output = test.run(&["build"])?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_snapshot!(output.stdout, @r"
      en: 2 files written
      fr: 2 files written, 1 missing translation
    ✓ Translated 2 source files into 2 locales, copied 1 file
    ");
    assert_snapshot!(output.stderr, @"warning: 1 missing translation in fr (use -v for details)");

    assert_eq!(test.read_file("dist/js/main.js")?, "title = 'Canvas';\n");
    assert_eq!(test.read_file("dist/js/main_fr.js")?, "title = 'Toile';\n");
    assert_eq!(
        test.read_file("dist/index_fr.html")?,
        "<h1>{{i18n('Localization', 'Chat') | raw}}</h1>\n"
    );
    assert_eq!(
        test.read_file("dist/serviceWorker.js")?,
        "self.skipWaiting();\n"
    );
    assert!(!test.root().join("dist/serviceWorker_fr.js").exists());

    Ok(())
}

#[test]
fn test_build_verbose_lists_missing_translations() -> Result<()> {
    let test = CliTest::with_project()?;

    let output = test.run(&["build", "-v"])?;

    assert_eq!(output.code, Some(0));
    assert_snapshot!(output.stdout, @r#"
    warning: missing translation for "Chat"  missing-translation
      --> public/index.html:1:28
      |
    1 | <h1>{{i18n('Localization', 'Chat') | raw}}</h1>
      |                            ^
      = note: no translation in fr, original text kept

    ✘ 1 problem (0 errors, 1 warning)

      en: 2 files written
      fr: 2 files written, 1 missing translation
    ✓ Translated 2 source files into 2 locales, copied 1 file
    "#);
    assert!(!output.stderr.contains("use -v for details"));

    Ok(())
}

#[test]
fn test_build_parse_error_fails() -> Result<()> {
    let test = CliTest::with_project()?;
    test.write_file("public/js/broken.js", "const = ;\n")?;

    let output = test.run(&["build"])?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.starts_with("error: "), "{}", output.stdout);
    assert!(output.stdout.contains("parse-error"));
    assert!(output.stdout.contains("  --> public/js/broken.js\n"));
    assert!(output.stdout.contains("✘ 2 localized files not written"));
    assert!(!test.root().join("dist/js/broken.js").exists());
    assert_eq!(test.read_file("dist/js/main_fr.js")?, "title = 'Toile';\n");

    Ok(())
}

#[test]
fn test_build_out_dir_override() -> Result<()> {
    let test = CliTest::with_project()?;

    let output = test.run(&["build", "--out-dir", "./www"])?;

    assert_eq!(output.code, Some(0));
    assert!(test.root().join("www/js/main_fr.js").exists());
    assert!(!test.root().join("dist").exists());

    Ok(())
}

#[test]
fn test_build_uses_config_file() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".poglotrc.json",
        r#"{ "sourceRoot": "./web", "translationFunction": "t", "copyFiles": [] }"#,
    )?;
    test.write_file("web/app.js", "alert(t('Canvas'));\n")?;
    test.write_file("po/Localization_de.po", "msgid \"Canvas\"\nmsgstr \"Leinwand\"\n")?;

    let output = test.run(&["build"])?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_eq!(test.read_file("dist/app_de.js")?, "alert('Leinwand');\n");

    Ok(())
}

#[test]
fn test_build_without_catalog_dir_is_an_error() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("public/app.js", "__('x');\n")?;

    let output = test.run(&["build"])?;

    assert_eq!(output.code, Some(2));
    assert!(
        output.stderr.starts_with("Error: Failed to read catalog directory"),
        "{}",
        output.stderr
    );

    Ok(())
}
