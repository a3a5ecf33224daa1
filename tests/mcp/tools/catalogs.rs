use std::fs;

use poglot::mcp::{
    PoglotMcpServer,
    types::{GetLocalesParams, ReloadCatalogsParams, SourceFormat, TranslateSourceParams},
};
use rmcp::handler::server::wrapper::Parameters;

use crate::{McpTestFixture, extract_tool_result_json, fixture_two_locales};

// ============================================================================
// get_locales tests
// ============================================================================

#[tokio::test]
async fn test_get_locales() {
    let fixture = fixture_two_locales().unwrap();
    let server = PoglotMcpServer::new();

    let params = Parameters(GetLocalesParams {
        project_root_path: fixture.root(),
    });
    let result = server.get_locales(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["defaultLocale"], "en");
    let locales = json_result["locales"].as_array().unwrap();
    assert_eq!(locales.len(), 2);
    assert_eq!(locales[0]["locale"], "en");
    assert_eq!(locales[0]["language"], "English");
    assert_eq!(locales[0]["translatedCount"], 2);
    assert_eq!(locales[1]["locale"], "fr");
    assert_eq!(locales[1]["entryCount"], 2);
    assert_eq!(locales[1]["translatedCount"], 1);
    assert!(
        locales[1]["filePath"]
            .as_str()
            .unwrap()
            .ends_with("Localization_fr.po")
    );
}

#[tokio::test]
async fn test_get_locales_ignores_other_files() {
    let fixture = McpTestFixture::with_catalogs(vec![
        ("Localization_sv.po", "msgid \"Chat\"\nmsgstr \"Chatt\"\n"),
        ("Localization.pot", "msgid \"Chat\"\nmsgstr \"\"\n"),
        ("Other_fr.po", "msgid \"Chat\"\nmsgstr \"Discussion\"\n"),
    ])
    .unwrap();
    let server = PoglotMcpServer::new();

    let params = Parameters(GetLocalesParams {
        project_root_path: fixture.root(),
    });
    let result = server.get_locales(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    let locales = json_result["locales"].as_array().unwrap();
    assert_eq!(locales.len(), 1);
    assert_eq!(locales[0]["locale"], "sv");
    assert_eq!(locales[0]["language"], "Swedish");
}

// ============================================================================
// reload_catalogs tests
// ============================================================================

fn translate_params(fixture: &McpTestFixture) -> Parameters<TranslateSourceParams> {
    Parameters(TranslateSourceParams {
        project_root_path: fixture.root(),
        locale: "fr".to_string(),
        source: "x = __('Chat');".to_string(),
        format: SourceFormat::Script,
        function: None,
    })
}

#[tokio::test]
async fn test_catalogs_are_cached_until_reload() {
    let fixture = fixture_two_locales().unwrap();
    let server = PoglotMcpServer::new();

    let first = server
        .translate_source(translate_params(&fixture))
        .await
        .unwrap();
    assert_eq!(extract_tool_result_json(&first)["text"], "x = 'Chat';");
    assert_eq!(server.cached_catalog_dirs(), 1);

    fs::write(
        fixture.root_path().join("po/Localization_fr.po"),
        "msgid \"Chat\"\nmsgstr \"Discussion\"\n",
    )
    .unwrap();

    // Still served from the cache.
    let cached = server
        .translate_source(translate_params(&fixture))
        .await
        .unwrap();
    assert_eq!(extract_tool_result_json(&cached)["text"], "x = 'Chat';");

    let reload = server
        .reload_catalogs(Parameters(ReloadCatalogsParams {
            project_root_path: fixture.root(),
        }))
        .await
        .unwrap();
    assert_eq!(extract_tool_result_json(&reload)["droppedCount"], 1);

    let fresh = server
        .translate_source(translate_params(&fixture))
        .await
        .unwrap();
    assert_eq!(extract_tool_result_json(&fresh)["text"], "x = 'Discussion';");
}
