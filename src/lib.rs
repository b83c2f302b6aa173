/*!
 * GLM - Copy installed packages between storage libraries
 *
 * This library plans and performs the transfer of one installed package from
 * one library root to another, skipping files that already exist at the
 * destination with the same size.
 */

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod library;
pub mod manifest;
pub mod menu;
pub mod report;
pub mod store;
pub mod transfer;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use catalog::PathCatalog;
pub use config::Config;
pub use error::{GlmError, Result};
pub use library::LibraryLayout;
pub use manifest::{ManifestScanner, PackageManifest};
pub use report::{BarReporter, TransferReport};
pub use transfer::{
    CopyProgress, ExecutionSummary, PlanExecutor, ProgressReporter, Transfer, TransferRequest,
    TreePlanner,
};
pub use types::{CopyPlan, DirNode, FileAction, FileNode, PlanNode, PlanSummary};
pub use utils::format_file_size;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
