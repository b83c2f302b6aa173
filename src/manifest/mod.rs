/*!
 * Discovery of installed packages inside a library
 *
 * Each library keeps one manifest file per installed package directly under
 * its packages directory. The manifest names the package and the directory
 * under `common/` that holds its files.
 */

mod error;
pub mod keyvalues;

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

pub use error::{ManifestError, ManifestResult};

use crate::error::{Result, ResultExt};
use crate::library::{is_plain_name, LibraryLayout};

/// File names accepted as package manifests
static MANIFEST_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^appmanifest_(\d+)\.acf$").expect("manifest name pattern is valid")
});

/// An installed package as described by its manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManifest {
    /// Manifest file name relative to the packages directory
    pub manifest_file: String,
    /// Numeric id taken from the manifest file name
    pub app_id: u64,
    /// Human readable package name
    pub display_name: String,
    /// Directory name under `common/`
    pub install_dir: String,
}

impl PackageManifest {
    /// Parse manifest text belonging to `manifest_file`
    pub fn parse(manifest_file: &str, text: &str) -> ManifestResult<Self> {
        let app_id = manifest_app_id(manifest_file)
            .ok_or_else(|| ManifestError::MissingKey("appid".to_string()))?;

        let doc = keyvalues::parse(text)?;
        let state = doc
            .get_block("AppState")
            .ok_or_else(|| ManifestError::MissingKey("AppState".to_string()))?;
        let display_name = state
            .get_str("name")
            .ok_or_else(|| ManifestError::MissingKey("AppState.name".to_string()))?;
        let install_dir = state
            .get_str("installdir")
            .ok_or_else(|| ManifestError::MissingKey("AppState.installdir".to_string()))?;

        if !is_plain_name(install_dir) {
            return Err(ManifestError::InvalidPath {
                key: "installdir",
                value: install_dir.to_string(),
            });
        }

        Ok(Self {
            manifest_file: manifest_file.to_string(),
            app_id,
            display_name: display_name.to_string(),
            install_dir: install_dir.to_string(),
        })
    }
}

/// App id encoded in a manifest file name, if the name is a manifest name
pub fn manifest_app_id(file_name: &str) -> Option<u64> {
    MANIFEST_NAME
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Lists the packages installed in a library
pub struct ManifestScanner {
    layout: LibraryLayout,
}

impl ManifestScanner {
    /// Create a new scanner
    pub fn new(layout: LibraryLayout) -> Self {
        Self { layout }
    }

    /// Read every manifest in `root`, sorted by display name
    ///
    /// Manifests that cannot be read or parsed are skipped.
    pub fn scan(&self, root: &Path) -> Result<Vec<PackageManifest>> {
        let packages = self.layout.packages_path(root);
        let mut manifests = Vec::new();

        for entry in fs::read_dir(&packages).at_path(&packages)? {
            let entry = entry.at_path(&packages)?;
            let file_name = entry.file_name().to_string_lossy().to_string();
            if manifest_app_id(&file_name).is_none() {
                continue;
            }

            let path = entry.path();
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping unreadable manifest {}: {}", path.display(), e);
                    continue;
                }
            };

            match PackageManifest::parse(&file_name, &text) {
                Ok(manifest) => manifests.push(manifest),
                Err(e) => warn!("Skipping malformed manifest {}: {}", path.display(), e),
            }
        }

        manifests.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then(a.app_id.cmp(&b.app_id))
        });
        debug!(
            "Found {} packages in {}",
            manifests.len(),
            packages.display()
        );

        Ok(manifests)
    }

    /// Read a single manifest by file name
    pub fn load(&self, root: &Path, manifest_file: &str) -> Result<PackageManifest> {
        let path = self.layout.manifest_path(root, manifest_file);
        crate::ensure!(path.is_file(), NotFound, "{}", path.display());

        let text = fs::read_to_string(&path).at_path(&path)?;
        Ok(PackageManifest::parse(manifest_file, &text)?)
    }

    /// Find a package by manifest file name, display name, install directory or app id
    pub fn find(&self, root: &Path, query: &str) -> Result<PackageManifest> {
        if manifest_app_id(query).is_some() {
            return self.load(root, query);
        }

        let manifests = self.scan(root)?;
        manifests
            .into_iter()
            .find(|m| {
                m.display_name == query
                    || m.install_dir == query
                    || query.parse::<u64>().map_or(false, |id| id == m.app_id)
            })
            .ok_or_else(|| {
                crate::error!(NotFound, "package '{}' in {}", query, root.display())
            })
    }
}
