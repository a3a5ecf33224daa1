use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".poglotrc.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding the scripts and pages to localize.
    #[serde(default = "default_source_root")]
    pub source_root: String,
    /// Script patterns, relative to `sourceRoot`.
    #[serde(default = "default_scripts")]
    pub scripts: Vec<String>,
    /// HTML page patterns, relative to `sourceRoot`.
    #[serde(default = "default_pages")]
    pub pages: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    /// Files written to the output once, untranslated.
    #[serde(default = "default_copy_files")]
    pub copy_files: Vec<String>,
    #[serde(default = "default_views_root")]
    pub views_root: String,
    #[serde(default = "default_views")]
    pub views: Vec<String>,
    #[serde(default = "default_po_root")]
    pub po_root: String,
    #[serde(default = "default_catalog_name")]
    pub catalog_name: String,
    #[serde(default = "default_locale")]
    pub default_locale: String,
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
    #[serde(default = "default_translation_function")]
    pub translation_function: String,
    #[serde(default = "default_view_helper")]
    pub view_helper: String,
    #[serde(default = "default_project_id")]
    pub project_id: String,
}

fn default_source_root() -> String {
    "./public".to_string()
}

fn default_scripts() -> Vec<String> {
    vec!["**/*.js".to_string()]
}

fn default_pages() -> Vec<String> {
    vec!["**/*.html".to_string()]
}

fn default_ignores() -> Vec<String> {
    ["**/*.min.js", "**/*-min.js", "include/**", "profile/**"]
        .map(String::from)
        .to_vec()
}

fn default_copy_files() -> Vec<String> {
    [
        "SLIDEIN.js",
        "serviceWorker.js",
        "auth_done.html",
        "mobile_captcha.html",
    ]
    .map(String::from)
    .to_vec()
}

fn default_views_root() -> String {
    "./views".to_string()
}

fn default_views() -> Vec<String> {
    vec!["**/*.hbs".to_string()]
}

fn default_po_root() -> String {
    "./po".to_string()
}

fn default_catalog_name() -> String {
    "Localization".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_out_dir() -> String {
    "./dist".to_string()
}

fn default_translation_function() -> String {
    "__".to_string()
}

fn default_view_helper() -> String {
    "i18n".to_string()
}

fn default_project_id() -> String {
    "Pxls".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            scripts: default_scripts(),
            pages: default_pages(),
            ignores: default_ignores(),
            copy_files: default_copy_files(),
            views_root: default_views_root(),
            views: default_views(),
            po_root: default_po_root(),
            catalog_name: default_catalog_name(),
            default_locale: default_locale(),
            out_dir: default_out_dir(),
            translation_function: default_translation_function(),
            view_helper: default_view_helper(),
            project_id: default_project_id(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Every pattern list must hold valid globs, and the names used to build
    /// file names and call guards must be non-empty.
    pub fn validate(&self) -> Result<()> {
        for (field, patterns) in [
            ("scripts", &self.scripts),
            ("pages", &self.pages),
            ("ignores", &self.ignores),
            ("copyFiles", &self.copy_files),
            ("views", &self.views),
        ] {
            for pattern in patterns {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in '{}': \"{}\"", field, pattern)
                })?;
            }
        }

        if self.translation_function.trim().is_empty() {
            bail!("'translationFunction' must not be empty");
        }
        if self.catalog_name.trim().is_empty() {
            bail!("'catalogName' must not be empty");
        }
        if self.default_locale.trim().is_empty() {
            bail!("'defaultLocale' must not be empty");
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Config file that was loaded, `None` when using defaults.
    pub path: Option<PathBuf>,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
