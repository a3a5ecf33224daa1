use poglot::mcp::{PoglotMcpServer, types::GetConfigParams};
use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;

use crate::{McpTestFixture, extract_tool_result_json};

// ============================================================================
// get_config tests
// ============================================================================

#[tokio::test]
async fn test_get_config_defaults() {
    let fixture = McpTestFixture::new().unwrap();
    let server = PoglotMcpServer::new();

    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let result = server.get_config(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["config"]["poRoot"], "./po");
    assert_eq!(json_result["config"]["catalogName"], "Localization");
    assert_eq!(json_result["config"]["defaultLocale"], "en");
    assert!(json_result["config"]["scripts"].is_array());
    assert_eq!(json_result["fromFile"], false);
    assert!(json_result.get("configPath").is_none());
}

#[tokio::test]
async fn test_get_config_from_poglotrc() {
    let fixture = McpTestFixture::new().unwrap();
    fixture
        .write_config(&json!({
            "poRoot": "./locales",
            "translationFunction": "t"
        }))
        .unwrap();

    let server = PoglotMcpServer::new();
    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let result = server.get_config(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["fromFile"], true);
    assert_eq!(json_result["config"]["poRoot"], "./locales");
    assert_eq!(json_result["config"]["translationFunction"], "t");
    assert_eq!(json_result["config"]["sourceRoot"], "./public");
}

#[tokio::test]
async fn test_get_config_invalid_file() {
    let fixture = McpTestFixture::new().unwrap();
    fixture
        .write_config(&json!({ "scripts": ["[invalid"] }))
        .unwrap();

    let server = PoglotMcpServer::new();
    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let err = server.get_config(params).await.unwrap_err();
    assert!(err.message.contains("Invalid glob pattern"), "{}", err.message);
}
