//! Global error handling for glm
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::manifest::ManifestError;

/// Global error type for glm operations
#[derive(Error, Debug)]
pub enum GlmError {
    /// File system errors without a known path
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// File system errors tied to a specific path
    #[error("IO error at {}: {source}", path.display())]
    PathIo {
        /// Path that was being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Directory walk errors
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A required source path is missing
    #[error("Path not found: {0}")]
    NotFound(String),

    /// Source and destination resolve to the same library
    #[error("Source and destination can't be the same library: {0}")]
    InvalidLibraryPair(String),

    /// Library is not registered in the catalog
    #[error("Unknown library: {0}")]
    UnknownLibrary(String),

    /// Directory rejected as a library root
    #[error("Invalid library: {0}")]
    InvalidLibrary(String),

    /// Manifest errors
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Interactive prompt errors
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl GlmError {
    /// Whether the caller can re-prompt instead of aborting
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::InvalidLibraryPair(_)
                | Self::UnknownLibrary(_)
                | Self::InvalidLibrary(_)
        )
    }
}

/// Specialized Result type for glm operations
pub type Result<T> = std::result::Result<T, GlmError>;

/// Creates a GlmError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::GlmError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for attaching a path to IO errors
pub trait ResultExt<T> {
    /// Tag the error with the path the operation was working on
    fn at_path(self, path: &Path) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, io::Error> {
    fn at_path(self, path: &Path) -> Result<T> {
        self.map_err(|source| GlmError::PathIo {
            path: path.to_path_buf(),
            source,
        })
    }
}

// Allow converting GlmError to io::Error for callers and tests that only speak io
impl From<GlmError> for io::Error {
    fn from(err: GlmError) -> Self {
        match err {
            GlmError::Io(e) => e,
            GlmError::PathIo { source, .. } => source,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
