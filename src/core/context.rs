use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::{
    config::{Config, load_config},
    core::{
        catalog::{CatalogFile, scan_catalogs},
        file_scanner::FileMatcher,
    },
};

/// Configuration overrides coming from the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub source_root: Option<PathBuf>,
    pub po_root: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

/// Resolved project settings shared by every command.
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. CLI arguments (e.g., `--po-root ./po`)
/// 2. `.poglotrc.json` config file
/// 3. Built-in defaults
///
/// Relative paths are resolved against `root_dir`.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub config: Config,
    pub root_dir: PathBuf,
    /// Config file that was loaded, `None` when using defaults.
    pub config_path: Option<PathBuf>,
    pub verbose: bool,
}

impl ProjectContext {
    /// Load the config found from `root_dir` upwards and apply overrides.
    pub fn load(root_dir: &Path, overrides: &Overrides, verbose: bool) -> Result<Self> {
        let loaded = load_config(root_dir)?;

        if verbose && loaded.path.is_none() {
            eprintln!("Note: No .poglotrc.json found, using default configuration");
        }

        let mut config = loaded.config;
        if let Some(source_root) = &overrides.source_root {
            config.source_root = source_root.to_string_lossy().to_string();
        }
        if let Some(po_root) = &overrides.po_root {
            config.po_root = po_root.to_string_lossy().to_string();
        }
        if let Some(out_dir) = &overrides.out_dir {
            config.out_dir = out_dir.to_string_lossy().to_string();
        }

        Ok(Self {
            config,
            root_dir: root_dir.to_path_buf(),
            config_path: loaded.path,
            verbose,
        })
    }

    pub fn with_config(root_dir: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            config,
            root_dir: root_dir.into(),
            config_path: None,
            verbose: false,
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        let relative = path.strip_prefix(".").unwrap_or(path);
        self.root_dir.join(relative)
    }

    pub fn source_root(&self) -> PathBuf {
        self.resolve(&self.config.source_root)
    }

    pub fn views_root(&self) -> PathBuf {
        self.resolve(&self.config.views_root)
    }

    pub fn po_root(&self) -> PathBuf {
        self.resolve(&self.config.po_root)
    }

    pub fn out_dir(&self) -> PathBuf {
        self.resolve(&self.config.out_dir)
    }

    /// Project-relative display form of a file found under a configured
    /// directory, e.g. `public/js/board.js`.
    pub fn display_path(&self, configured_dir: &str, relative: &str) -> String {
        let dir = configured_dir
            .strip_prefix("./")
            .unwrap_or(configured_dir)
            .trim_end_matches('/');
        if dir.is_empty() || dir == "." {
            relative.to_string()
        } else {
            format!("{}/{}", dir, relative)
        }
    }

    /// Path of the extracted template, e.g. `po/Localization.pot`.
    pub fn template_path(&self) -> PathBuf {
        self.po_root()
            .join(format!("{}.pot", self.config.catalog_name))
    }

    fn excluded_from_translation(&self) -> Vec<String> {
        self.config
            .ignores
            .iter()
            .chain(&self.config.copy_files)
            .cloned()
            .collect()
    }

    pub fn script_matcher(&self) -> FileMatcher {
        FileMatcher::new(&self.config.scripts, &self.excluded_from_translation())
    }

    pub fn page_matcher(&self) -> FileMatcher {
        FileMatcher::new(&self.config.pages, &self.excluded_from_translation())
    }

    pub fn copy_matcher(&self) -> FileMatcher {
        FileMatcher::new(&self.config.copy_files, &[])
    }

    pub fn view_matcher(&self) -> FileMatcher {
        FileMatcher::new(&self.config.views, &[])
    }

    /// Catalog files present in the catalog directory.
    pub fn catalogs(&self) -> Result<Vec<CatalogFile>> {
        scan_catalogs(
            &self.po_root(),
            &self.config.catalog_name,
            &self.config.default_locale,
        )
    }

    /// Catalog file serving `locale`; the unsuffixed file wins when both
    /// `<name>.po` and `<name>_<default>.po` exist.
    pub fn catalog_for(&self, locale: &str) -> Result<Option<CatalogFile>> {
        Ok(self
            .catalogs()?
            .into_iter()
            .find(|file| file.locale == locale))
    }
}
