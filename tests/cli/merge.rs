use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::CliTest;

#[test]
fn test_merge_updates_catalogs() -> Result<()> {
    let test = CliTest::with_project()?;
    test.write_file("public/js/board.js", "label = __('Place');\n")?;

    let extract = test.run(&["extract"])?;
    assert_eq!(extract.code, Some(0), "stderr: {}", extract.stderr);

    let output = test.run(&["merge"])?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_snapshot!(output.stdout, @r"
      Localization.po (English): 3 strings, 2 translated
      Localization_fr.po (French): 3 strings, 1 translated
    ✓ Merged template into 2 catalogs
    ");

    let french = test.read_file("po/Localization_fr.po")?;
    assert!(french.contains("\"Language-Team: French\\n\""));
    assert!(french.contains("\"Last-Translator: Automatic generation\\n\""));
    assert!(french.contains("msgid \"Canvas\"\nmsgstr \"Toile\""));
    assert!(french.contains("msgid \"Place\"\nmsgstr \"\""));

    Ok(())
}

#[test]
fn test_merge_then_build_keeps_translations() -> Result<()> {
    let test = CliTest::with_project()?;

    assert_eq!(test.run(&["extract"])?.code, Some(0));
    assert_eq!(test.run(&["merge"])?.code, Some(0));
    let output = test.run(&["build"])?;

    assert_eq!(output.code, Some(0));
    assert_eq!(test.read_file("dist/js/main_fr.js")?, "title = 'Toile';\n");

    Ok(())
}

#[test]
fn test_merge_without_template_is_an_error() -> Result<()> {
    let test = CliTest::with_project()?;

    let output = test.run(&["merge"])?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.contains("run `poglot extract` first"));

    Ok(())
}
