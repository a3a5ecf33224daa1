use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::Result;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use swc_common::SourceMap;

use super::types::{
    ConfigDto, GetConfigParams, GetLocalesParams, LocaleInfo, LocalesResult, MissingItem,
    PositionItem, ReloadCatalogsParams, ReloadCatalogsResult, SourceFormat,
    TranslateSourceParams, TranslateSourceResult,
};
use crate::{
    core::{
        Overrides, ProjectContext, catalog::CatalogCache, merge::language_name,
        translate::PreparedSource,
    },
    utils::LineIndex,
};

#[derive(Clone)]
pub struct PoglotMcpServer {
    tool_router: ToolRouter<Self>,
    /// One cache per catalog directory, kept until `reload_catalogs`.
    caches: Arc<Mutex<HashMap<PathBuf, Arc<CatalogCache>>>>,
}

impl Default for PoglotMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PoglotMcpServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
            caches: Arc::default(),
        }
    }

    /// Number of catalog directories with a live cache.
    pub fn cached_catalog_dirs(&self) -> usize {
        self.caches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn cache_for(&self, ctx: &ProjectContext) -> Arc<CatalogCache> {
        let mut caches = self.caches.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(caches.entry(ctx.po_root()).or_default())
    }

    /// Get the current poglot configuration
    #[tool(description = "Get the current poglot configuration.")]
    pub async fn get_config(
        &self,
        params: Parameters<GetConfigParams>,
    ) -> Result<CallToolResult, McpError> {
        let ctx = load_context(&params.0.project_root_path)?;

        json_result(&ConfigDto {
            from_file: ctx.config_path.is_some(),
            config_path: ctx
                .config_path
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            config: ctx.config,
        })
    }

    /// List catalogs with their entry counts
    #[tool(
        description = "Get the locales that have a .po catalog, with entry and translated counts."
    )]
    pub async fn get_locales(
        &self,
        params: Parameters<GetLocalesParams>,
    ) -> Result<CallToolResult, McpError> {
        let ctx = load_context(&params.0.project_root_path)?;
        let cache = self.cache_for(&ctx);

        let catalogs = ctx.catalogs().map_err(|e| {
            McpError::internal_error(format!("Failed to list catalogs: {}", e), None)
        })?;

        let mut locales = Vec::with_capacity(catalogs.len());
        for file in catalogs {
            let catalog = cache.get(&file.path).map_err(|e| {
                McpError::internal_error(format!("Failed to load catalog: {:#}", e), None)
            })?;
            locales.push(LocaleInfo {
                language: language_name(&file.locale).map(String::from),
                file_path: file.path.to_string_lossy().to_string(),
                entry_count: catalog.entry_count(),
                translated_count: catalog.translated_count(),
                locale: file.locale,
            });
        }

        json_result(&LocalesResult {
            po_root: ctx.po_root().to_string_lossy().to_string(),
            default_locale: ctx.config.default_locale.clone(),
            locales,
        })
    }

    /// Translate a script or page for one locale
    #[tool(
        description = "Replace every translation call in the given script (or i18n tag in the given page) with the translation from the locale's catalog. Returns the translated text and the msgids that have no translation."
    )]
    pub async fn translate_source(
        &self,
        params: Parameters<TranslateSourceParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let ctx = load_context(&params.project_root_path)?;
        let cache = self.cache_for(&ctx);

        let file = ctx
            .catalog_for(&params.locale)
            .map_err(|e| {
                McpError::internal_error(format!("Failed to list catalogs: {:#}", e), None)
            })?
            .ok_or_else(|| {
                McpError::invalid_params(
                    format!("No catalog for locale '{}'", params.locale),
                    None,
                )
            })?;
        let catalog = cache.get(&file.path).map_err(|e| {
            McpError::internal_error(format!("Failed to load catalog: {:#}", e), None)
        })?;

        let prepared = match params.format {
            SourceFormat::Script => {
                let function = params
                    .function
                    .unwrap_or_else(|| ctx.config.translation_function.clone());
                PreparedSource::script(
                    params.source,
                    "<source>",
                    &function,
                    Arc::new(SourceMap::default()),
                )
            }
            SourceFormat::Page => PreparedSource::page(params.source, &ctx.config.catalog_name),
        }
        .map_err(|e| McpError::invalid_params(format!("Failed to parse source: {:#}", e), None))?;

        let output = prepared
            .translate(&*catalog)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        let index = LineIndex::new(&prepared.text);
        let missing = output
            .missing
            .into_iter()
            .map(|m| {
                let offset = prepared.sites.get(m.index).map_or(0, |s| s.range.start);
                let (line, col) = index.line_col(&prepared.text, offset);
                MissingItem {
                    key: m.key,
                    line,
                    col,
                }
            })
            .collect();

        json_result(&TranslateSourceResult {
            locale: params.locale,
            text: output.text,
            call_count: prepared.sites.len(),
            missing,
            dynamic_calls: prepared
                .dynamic_calls
                .iter()
                .map(|c| PositionItem {
                    line: c.line,
                    col: c.col,
                })
                .collect(),
        })
    }

    /// Drop cached catalogs so the next call reads the .po files again
    #[tool(
        description = "Reload catalogs from disk. Call after editing .po files or running merge."
    )]
    pub async fn reload_catalogs(
        &self,
        params: Parameters<ReloadCatalogsParams>,
    ) -> Result<CallToolResult, McpError> {
        let ctx = load_context(&params.0.project_root_path)?;
        let dropped_count = self.cache_for(&ctx).invalidate_all();

        json_result(&ReloadCatalogsResult {
            po_root: ctx.po_root().to_string_lossy().to_string(),
            dropped_count,
        })
    }
}

fn load_context(project_root_path: &str) -> Result<ProjectContext, McpError> {
    ProjectContext::load(Path::new(project_root_path), &Overrides::default(), false)
        .map_err(|e| McpError::internal_error(format!("Failed to load config: {:#}", e), None))
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json_str = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("JSON serialization failed: {}", e), None)
    })?;

    Ok(CallToolResult::success(vec![Content::text(json_str)]))
}

#[tool_handler]
impl ServerHandler for PoglotMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "poglot MCP gives AI agents access to gettext catalogs of a project.\n\n\
                 Available tools:\n\
                 1. get_config - Get project configuration\n\
                 2. get_locales - Get catalogs and their translated counts\n\
                 3. translate_source - Translate a script or page with one catalog\n\
                 4. reload_catalogs - Re-read .po files after they changed\n\n\
                 Catalogs are cached per catalog directory; call reload_catalogs\n\
                 after editing .po files, otherwise stale translations are used."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Entry point for MCP server
pub fn run_server() -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let service = PoglotMcpServer::new();
            let server = service.serve(rmcp::transport::stdio()).await?;
            server.waiting().await?;
            Ok(())
        })
}
