/*!
 * Registry of library root paths
 */

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::store::ConfigStore;

/// Store key holding the ordered list of library roots
pub const LIBRARIES_KEY: &str = "libraries";

/// Ordered, duplicate-free list of library roots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathCatalog {
    roots: Vec<PathBuf>,
}

impl PathCatalog {
    /// Build a catalog from a list of roots, dropping duplicates
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut catalog = Self::default();
        for root in roots {
            catalog.add(root);
        }
        catalog
    }

    /// Read the catalog from the store, initialising the key when absent
    pub fn load(store: &mut ConfigStore) -> Result<Self> {
        match store.get::<Vec<PathBuf>>(LIBRARIES_KEY)? {
            Some(roots) => {
                debug!("Loaded {} libraries from {}", roots.len(), store.path().display());
                Ok(Self::new(roots))
            }
            None => {
                let catalog = Self::default();
                catalog.save(store)?;
                Ok(catalog)
            }
        }
    }

    /// Write the catalog back to the store
    pub fn save(&self, store: &mut ConfigStore) -> Result<()> {
        store.set(LIBRARIES_KEY, &self.roots)
    }

    /// Library roots in insertion order
    pub fn list(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn contains(&self, root: &Path) -> bool {
        self.roots.iter().any(|r| r == root)
    }

    /// Add a root; returns `false` if it was already registered
    pub fn add(&mut self, root: PathBuf) -> bool {
        if self.contains(&root) {
            return false;
        }
        info!("Added library {}", root.display());
        self.roots.push(root);
        true
    }

    /// Remove a registered root
    pub fn remove(&mut self, root: &Path) -> Result<()> {
        let index = self
            .roots
            .iter()
            .position(|r| r == root)
            .ok_or_else(|| crate::error!(UnknownLibrary, "{}", root.display()))?;
        self.roots.remove(index);
        info!("Removed library {}", root.display());
        Ok(())
    }

    /// Resolve a 1-based index as shown by `list`, or a registered path
    pub fn resolve(&self, query: &str) -> Result<PathBuf> {
        if let Ok(index) = query.parse::<usize>() {
            if let Some(root) = index.checked_sub(1).and_then(|i| self.roots.get(i)) {
                return Ok(root.clone());
            }
        }

        let path = Path::new(query);
        self.roots
            .iter()
            .find(|r| r.as_path() == path)
            .cloned()
            .ok_or_else(|| crate::error!(UnknownLibrary, "{}", query))
    }
}
