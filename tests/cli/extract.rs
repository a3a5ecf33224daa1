use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::CliTest;

#[test]
fn test_extract_writes_template() -> Result<()> {
    let test = CliTest::with_project()?;
    test.write_file(
        "views/index.hbs",
        "{{! Site title }}\n<title>{{i18n \"Canvas\"}}</title>\n",
    )?;

    let output = test.run(&["extract"])?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_snapshot!(
        output.stdout,
        @"✓ Extracted 2 strings from 3 files into po/Localization.pot"
    );

    let template = test.read_file("po/Localization.pot")?;
    assert!(template.contains("\"Project-Id-Version: Pxls\\n\""));
    assert!(template.contains(
        "#. Site title\n#: views/index.hbs\n#: public/js/main.js\nmsgid \"Canvas\""
    ));
    assert!(template.contains("#: public/index.html\nmsgid \"Chat\""));

    Ok(())
}

#[test]
fn test_extract_reports_dynamic_calls() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("public/app.js", "x = __(name);\ny = __('Chat');\n")?;

    let output = test.run(&["extract"])?;

    assert_eq!(output.code, Some(0));
    assert_snapshot!(output.stdout, @r"
    warning: __ called without a string literal  dynamic-call
      --> public/app.js:1:5
      |
    1 | x = __(name);
      |     ^
      = hint: pass the message as a literal, e.g. `__('Text')`

    ✘ 1 problem (0 errors, 1 warning)

    ✓ Extracted 1 string from 1 file into po/Localization.pot
    ");

    Ok(())
}

#[test]
fn test_extract_parse_error_keeps_old_template() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("public/app.js", "__('Chat');\n")?;
    test.write_file("public/broken.js", "let = ;\n")?;
    test.write_file("po/Localization.pot", "old template\n")?;

    let output = test.run(&["extract"])?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("  --> public/broken.js\n"));
    assert!(
        output
            .stdout
            .ends_with("✘ po/Localization.pot not written: some files could not be parsed\n")
    );
    assert_eq!(test.read_file("po/Localization.pot")?, "old template\n");

    Ok(())
}
