//! Translation catalogs loaded from gettext PO files.
//!
//! - `Catalog`: msgid → translation lookup over one PO file
//! - `CatalogFile`: a PO file discovered on disk and the locale it serves
//! - `CatalogCache`: caller-owned cache of loaded catalogs

mod cache;

use std::{
    collections::HashMap,
    fs,
    hash::BuildHasher,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::core::parsers::po::{PoFile, load_po};

pub use cache::CatalogCache;

/// Resolves a message key to its translation.
pub trait Lookup {
    fn lookup<'a>(&'a self, key: &'a str) -> Option<&'a str>;
}

impl<S: BuildHasher> Lookup for HashMap<String, String, S> {
    fn lookup<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        self.get(key).map(String::as_str)
    }
}

/// Translations for one locale.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    translations: HashMap<String, String>,
    entry_count: usize,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_po(&load_po(path)?))
    }

    /// Index the non-obsolete entries of a PO file. The first entry wins
    /// when a msgid appears more than once.
    pub fn from_po(po: &PoFile) -> Self {
        let mut translations = HashMap::new();
        let mut entry_count = 0;
        for entry in po.entries.iter().filter(|e| !e.obsolete) {
            entry_count += 1;
            if let Some(translation) = entry.translation() {
                translations
                    .entry(entry.msgid.clone())
                    .or_insert_with(|| translation.to_string());
            }
        }
        Self {
            translations,
            entry_count,
        }
    }

    /// Number of live entries, translated or not.
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn translated_count(&self) -> usize {
        self.translations.len()
    }
}

impl Lookup for Catalog {
    fn lookup<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        self.translations.get(key).map(String::as_str)
    }
}

/// A catalog file on disk, e.g. `po/Localization_fr.po`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFile {
    pub locale: String,
    /// Suffix appended to localized output names (`""` or `"_fr"`).
    pub suffix: String,
    pub path: PathBuf,
}

impl CatalogFile {
    /// Recognize `<name>.po` (the default locale) and `<name>_<code>.po`.
    pub fn from_path(path: &Path, catalog_name: &str, default_locale: &str) -> Option<Self> {
        if path.extension().and_then(|e| e.to_str()) != Some("po") {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let rest = stem.strip_prefix(catalog_name)?;
        let (locale, suffix) = if rest.is_empty() {
            (default_locale.to_string(), String::new())
        } else {
            let code = rest.strip_prefix('_').filter(|c| !c.is_empty())?;
            (code.to_string(), rest.to_string())
        };
        Some(Self {
            locale,
            suffix,
            path: path.to_path_buf(),
        })
    }
}

/// List catalog files in `po_root`, sorted by locale, then suffix.
pub fn scan_catalogs(
    po_root: &Path,
    catalog_name: &str,
    default_locale: &str,
) -> Result<Vec<CatalogFile>> {
    let entries = fs::read_dir(po_root)
        .with_context(|| format!("Failed to read catalog directory: {:?}", po_root))?;

    let mut catalogs: Vec<CatalogFile> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path| CatalogFile::from_path(&path, catalog_name, default_locale))
        .collect();
    catalogs.sort_by(|a, b| a.locale.cmp(&b.locale).then_with(|| a.suffix.cmp(&b.suffix)));
    Ok(catalogs)
}
