use poglot::mcp::{
    PoglotMcpServer,
    types::{SourceFormat, TranslateSourceParams},
};
use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;

use crate::{extract_tool_result_json, fixture_two_locales};

fn params(
    root: String,
    locale: &str,
    source: &str,
    format: SourceFormat,
) -> Parameters<TranslateSourceParams> {
    Parameters(TranslateSourceParams {
        project_root_path: root,
        locale: locale.to_string(),
        source: source.to_string(),
        format,
        function: None,
    })
}

#[tokio::test]
async fn test_translate_script() {
    let fixture = fixture_two_locales().unwrap();
    let server = PoglotMcpServer::new();

    let source = "title = __('Canvas');\nchat = __(\"Chat\");\nx = __(name);\n";
    let result = server
        .translate_source(params(fixture.root(), "fr", source, SourceFormat::Script))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(
        json_result["text"],
        "title = 'Toile';\nchat = \"Chat\";\nx = __(name);\n"
    );
    assert_eq!(json_result["callCount"], 2);
    assert_eq!(
        json_result["missing"],
        json!([{ "key": "Chat", "line": 2, "col": 8 }])
    );
    assert_eq!(json_result["dynamicCalls"], json!([{ "line": 3, "col": 5 }]));
}

#[tokio::test]
async fn test_translate_page() {
    let fixture = fixture_two_locales().unwrap();
    let server = PoglotMcpServer::new();

    let source = "<h1>{{i18n('Localization', 'Canvas') | raw}}</h1>";
    let result = server
        .translate_source(params(fixture.root(), "fr", source, SourceFormat::Page))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(
        json_result["text"],
        "<h1>{{i18n('Localization', 'Toile') | raw}}</h1>"
    );
    assert_eq!(json_result["missing"], json!([]));
}

#[tokio::test]
async fn test_translate_with_custom_function() {
    let fixture = fixture_two_locales().unwrap();
    let server = PoglotMcpServer::new();

    let result = server
        .translate_source(Parameters(TranslateSourceParams {
            project_root_path: fixture.root(),
            locale: "fr".to_string(),
            source: "t('Canvas'); __('Canvas');".to_string(),
            format: SourceFormat::Script,
            function: Some("t".to_string()),
        }))
        .await
        .unwrap();

    assert_eq!(
        extract_tool_result_json(&result)["text"],
        "'Toile'; __('Canvas');"
    );
}

#[tokio::test]
async fn test_translate_unknown_locale() {
    let fixture = fixture_two_locales().unwrap();
    let server = PoglotMcpServer::new();

    let err = server
        .translate_source(params(fixture.root(), "de", "__('Canvas')", SourceFormat::Script))
        .await
        .unwrap_err();

    assert!(err.message.contains("No catalog for locale 'de'"));
}

#[tokio::test]
async fn test_translate_parse_error() {
    let fixture = fixture_two_locales().unwrap();
    let server = PoglotMcpServer::new();

    let err = server
        .translate_source(params(fixture.root(), "fr", "const = ;", SourceFormat::Script))
        .await
        .unwrap_err();

    assert!(err.message.contains("Failed to parse source"));
}
