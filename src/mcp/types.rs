use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::Config;

// ============================================================
// Tool Parameters
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetConfigParams {
    /// Absolute path of the project root
    pub project_root_path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetLocalesParams {
    /// Absolute path of the project root
    pub project_root_path: String,
}

/// How the given source text is scanned for translation calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// JavaScript with `__('msgid')` calls
    #[default]
    Script,
    /// HTML with `{{i18n('<catalog>', 'msgid') | raw}}` tags
    Page,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranslateSourceParams {
    /// Absolute path of the project root
    pub project_root_path: String,
    /// Locale code of the catalog to use, e.g. "fr"
    pub locale: String,
    /// Source text to translate
    pub source: String,
    #[serde(default)]
    pub format: SourceFormat,
    /// Translation function name (defaults to the configured one)
    #[serde(default)]
    pub function: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReloadCatalogsParams {
    /// Absolute path of the project root
    pub project_root_path: String,
}

// ============================================================
// Config Types (get_config)
// ============================================================

/// Configuration DTO for MCP
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDto {
    /// True if config was loaded from a file, false if using defaults
    pub from_file: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    pub config: Config,
}

// ============================================================
// Locales Types (get_locales)
// ============================================================

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocalesResult {
    pub po_root: String,
    pub default_locale: String,
    pub locales: Vec<LocaleInfo>,
}

/// One catalog file and its counts.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocaleInfo {
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub file_path: String,
    pub entry_count: usize,
    pub translated_count: usize,
}

// ============================================================
// Translate Types (translate_source)
// ============================================================

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranslateSourceResult {
    pub locale: String,
    pub text: String,
    /// Number of call sites replaced, including untranslated ones.
    pub call_count: usize,
    pub missing: Vec<MissingItem>,
    pub dynamic_calls: Vec<PositionItem>,
}

/// A msgid that kept its original text.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MissingItem {
    pub key: String,
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionItem {
    pub line: usize,
    pub col: usize,
}

// ============================================================
// Reload Types (reload_catalogs)
// ============================================================

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReloadCatalogsResult {
    pub po_root: String,
    /// Catalogs dropped from the cache.
    pub dropped_count: usize,
}
