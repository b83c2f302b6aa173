/*!
 * On-disk layout of a library root
 */

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, ResultExt};

/// Default name of the packages directory inside a library root
pub const DEFAULT_PACKAGES_DIR: &str = "steamapps";

/// Name of the directory holding package install trees
pub const COMMON_DIR: &str = "common";

/// True when `name` is exactly one normal path component
///
/// Install directories and manifest names come from manifest text and are
/// joined under a library root, so they must not be empty, absolute or
/// contain `..`.
pub fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Maps a library root to the paths the copy engine reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryLayout {
    /// Directory under the root that holds manifests and `common/`
    pub packages_dir: String,
}

impl Default for LibraryLayout {
    fn default() -> Self {
        Self {
            packages_dir: DEFAULT_PACKAGES_DIR.to_string(),
        }
    }
}

impl LibraryLayout {
    /// Create a layout with a custom packages directory name
    pub fn new(packages_dir: impl Into<String>) -> Self {
        Self {
            packages_dir: packages_dir.into(),
        }
    }

    /// `<root>/<packages>`
    pub fn packages_path(&self, root: &Path) -> PathBuf {
        root.join(&self.packages_dir)
    }

    /// `<root>/<packages>/common`
    pub fn common_path(&self, root: &Path) -> PathBuf {
        self.packages_path(root).join(COMMON_DIR)
    }

    /// `<root>/<packages>/common/<install_dir>`
    pub fn install_path(&self, root: &Path, install_dir: &str) -> PathBuf {
        self.common_path(root).join(install_dir)
    }

    /// `<root>/<packages>/<manifest_file>`
    pub fn manifest_path(&self, root: &Path, manifest_file: &str) -> PathBuf {
        self.packages_path(root).join(manifest_file)
    }

    /// Check that `root` is a directory holding a packages directory
    pub fn validate_root(&self, root: &Path) -> Result<()> {
        crate::ensure!(
            root.is_dir(),
            InvalidLibrary,
            "directory doesn't exist: {}",
            root.display()
        );
        crate::ensure!(
            self.packages_path(root).is_dir(),
            InvalidLibrary,
            "unable to find `{}` folder in {}",
            self.packages_dir,
            root.display()
        );
        Ok(())
    }

    /// Create `<root>/<packages>/common` if it is missing
    pub fn ensure_common(&self, root: &Path) -> Result<PathBuf> {
        let common = self.common_path(root);
        if !common.is_dir() {
            fs::create_dir_all(&common).at_path(&common)?;
        }
        Ok(common)
    }
}
