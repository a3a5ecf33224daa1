use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use anyhow::Result;

use super::Catalog;

/// Loaded catalogs by file path.
///
/// Owned by whoever drives a build or a server session and handed to the
/// code that needs lookups. Entries are loaded on first use and stay until
/// [`CatalogCache::invalidate_all`] is called.
#[derive(Debug, Default)]
pub struct CatalogCache {
    catalogs: RwLock<HashMap<PathBuf, Arc<Catalog>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the catalog stored at `path`, loading it on a miss.
    pub fn get(&self, path: &Path) -> Result<Arc<Catalog>> {
        if let Some(catalog) = self
            .catalogs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
        {
            return Ok(Arc::clone(catalog));
        }

        let loaded = Arc::new(Catalog::load(path)?);
        let mut catalogs = self
            .catalogs
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(
            catalogs.entry(path.to_path_buf()).or_insert(loaded),
        ))
    }

    /// Drop every loaded catalog. Returns how many were dropped.
    pub fn invalidate_all(&self) -> usize {
        let mut catalogs = self
            .catalogs
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let count = catalogs.len();
        catalogs.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.catalogs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
