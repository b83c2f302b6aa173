/*!
 * Package transfer between two libraries
 *
 * A transfer is planned first, shown to the user as a
 * [`PlanSummary`](crate::types::PlanSummary), and executed once confirmed.
 * Planning never writes. Execution re-checks every file against the
 * destination, and an interrupted transfer resumes by planning again.
 */

pub mod executor;
pub mod planner;
pub mod progress;

use std::path::{Component, Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::library::{is_plain_name, LibraryLayout};
use crate::manifest::{ManifestError, PackageManifest};
use crate::types::{CopyPlan, FileNode};

pub use executor::{ExecutionSummary, PlanExecutor, DEFAULT_CHUNK_SIZE};
pub use planner::TreePlanner;
pub use progress::{CopyProgress, NoProgress, ProgressReporter};

/// What to copy and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Library the package is copied from
    pub source_root: PathBuf,
    /// Library the package is copied to
    pub dest_root: PathBuf,
    /// Directory name under `common/`
    pub install_dir: String,
    /// Manifest file name under the packages directory
    pub manifest_file: String,
}

impl TransferRequest {
    pub fn new(
        source_root: impl Into<PathBuf>,
        dest_root: impl Into<PathBuf>,
        install_dir: impl Into<String>,
        manifest_file: impl Into<String>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            install_dir: install_dir.into(),
            manifest_file: manifest_file.into(),
        }
    }

    /// Request for the package described by `manifest`
    pub fn for_package(
        source_root: impl Into<PathBuf>,
        dest_root: impl Into<PathBuf>,
        manifest: &PackageManifest,
    ) -> Self {
        Self::new(
            source_root,
            dest_root,
            manifest.install_dir.clone(),
            manifest.manifest_file.clone(),
        )
    }
}

/// Reject a transfer whose source and destination are the same library
///
/// Only path text and symlink resolution are consulted; no directory is listed.
pub fn check_library_pair(source: &Path, destination: &Path) -> Result<()> {
    let same = normalize(source) == normalize(destination)
        || matches!(
            (source.canonicalize(), destination.canonicalize()),
            (Ok(a), Ok(b)) if a == b
        );
    crate::ensure!(!same, InvalidLibraryPair, "{}", source.display());
    Ok(())
}

fn check_plain_name(key: &'static str, value: &str) -> Result<()> {
    if is_plain_name(value) {
        return Ok(());
    }
    Err(ManifestError::InvalidPath {
        key,
        value: value.to_string(),
    }
    .into())
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Plans and executes package transfers for one library layout
#[derive(Debug, Clone)]
pub struct Transfer {
    layout: LibraryLayout,
    planner: TreePlanner,
    executor: PlanExecutor,
}

impl Transfer {
    pub fn new(layout: LibraryLayout, chunk_size: usize) -> Self {
        Self {
            layout,
            planner: TreePlanner::new(),
            executor: PlanExecutor::new(chunk_size),
        }
    }

    /// Build the plan for `request`
    ///
    /// Fails with `InvalidLibraryPair` before touching the filesystem when both
    /// roots are the same, with `Manifest` when the install directory or
    /// manifest name is not a single path component, and with `NotFound` when
    /// either is missing from the source.
    pub fn plan(&self, request: &TransferRequest) -> Result<CopyPlan> {
        check_library_pair(&request.source_root, &request.dest_root)?;
        check_plain_name("installdir", &request.install_dir)?;
        check_plain_name("manifest", &request.manifest_file)?;

        let source_install = self
            .layout
            .install_path(&request.source_root, &request.install_dir);
        let source_manifest = self
            .layout
            .manifest_path(&request.source_root, &request.manifest_file);
        crate::ensure!(
            source_install.is_dir(),
            NotFound,
            "{}",
            source_install.display()
        );
        crate::ensure!(
            source_manifest.is_file(),
            NotFound,
            "{}",
            source_manifest.display()
        );

        let dest_install = self
            .layout
            .install_path(&request.dest_root, &request.install_dir);
        let mut plan = self.planner.build_plan(&source_install, &dest_install)?;

        let dest_manifest = self
            .layout
            .manifest_path(&request.dest_root, &request.manifest_file);
        plan.manifest = Some(FileNode {
            name: request.manifest_file.clone(),
            action: planner::decide(&dest_manifest, 0),
            source: source_manifest,
            destination: dest_manifest,
            size: 0,
        });

        Ok(plan)
    }

    /// Execute a plan built for `request`
    pub fn execute<R>(
        &self,
        request: &TransferRequest,
        plan: &CopyPlan,
        reporter: &R,
    ) -> Result<ExecutionSummary>
    where
        R: ProgressReporter + ?Sized,
    {
        self.layout.ensure_common(&request.dest_root)?;
        info!(
            "Copying {} from {} to {}",
            request.install_dir,
            request.source_root.display(),
            request.dest_root.display()
        );
        self.executor.execute(plan, reporter)
    }
}
