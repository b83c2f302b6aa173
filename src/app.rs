/*!
 * Application state shared by the menu and the subcommands
 */

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::PathCatalog;
use crate::config::Config;
use crate::error::{Result, ResultExt};
use crate::manifest::{ManifestScanner, PackageManifest};
use crate::store::ConfigStore;
use crate::transfer::{ExecutionSummary, ProgressReporter, Transfer, TransferRequest};
use crate::types::CopyPlan;

/// Loaded configuration, library catalog and transfer engine
pub struct App {
    config: Config,
    store: ConfigStore,
    catalog: PathCatalog,
    scanner: ManifestScanner,
    transfer: Transfer,
}

impl App {
    /// Open the configuration store and load the library list
    pub fn open(config: Config) -> Result<Self> {
        let mut store = ConfigStore::open(&config.config_file)?;
        let catalog = PathCatalog::load(&mut store)?;
        let scanner = ManifestScanner::new(config.layout.clone());
        let transfer = Transfer::new(config.layout.clone(), config.chunk_size);

        Ok(Self {
            config,
            store,
            catalog,
            scanner,
            transfer,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &PathCatalog {
        &self.catalog
    }

    /// Register a library root
    ///
    /// The path must be a directory containing the packages directory. The
    /// stored path is absolute. `common/` is created under the packages
    /// directory when missing. Returns the stored path and whether it was new.
    pub fn add_library(&mut self, path: &Path) -> Result<(PathBuf, bool)> {
        self.config.layout.validate_root(path)?;
        let root = fs::canonicalize(path).at_path(path)?;

        let added = self.catalog.add(root.clone());
        if added {
            self.config.layout.ensure_common(&root)?;
            self.catalog.save(&mut self.store)?;
        } else {
            info!("Library {} is already registered", root.display());
        }
        Ok((root, added))
    }

    /// Forget a library given its path or list number
    pub fn remove_library(&mut self, query: &str) -> Result<PathBuf> {
        let root = self.catalog.resolve(query)?;
        self.catalog.remove(&root)?;
        self.catalog.save(&mut self.store)?;
        Ok(root)
    }

    /// Resolve a library given its path or list number
    pub fn library(&self, query: &str) -> Result<PathBuf> {
        self.catalog.resolve(query)
    }

    /// Packages installed in `library`, sorted by display name
    pub fn packages(&self, library: &Path) -> Result<Vec<PackageManifest>> {
        self.scanner.scan(library)
    }

    /// Find a package in `library`
    pub fn find_package(&self, library: &Path, query: &str) -> Result<PackageManifest> {
        self.scanner.find(library, query)
    }

    /// Plan copying `package` between two libraries
    pub fn plan_copy(&self, request: &TransferRequest) -> Result<CopyPlan> {
        self.transfer.plan(request)
    }

    /// Execute a confirmed plan
    pub fn run_copy<R>(
        &self,
        request: &TransferRequest,
        plan: &CopyPlan,
        reporter: &R,
    ) -> Result<ExecutionSummary>
    where
        R: ProgressReporter + ?Sized,
    {
        self.transfer.execute(request, plan, reporter)
    }
}
