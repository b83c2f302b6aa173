/*!
 * Error types for manifest parsing
 */

use thiserror::Error;

/// Errors that can occur while reading a package manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Input ended inside a string or block
    #[error("Unexpected end of input at line {line}")]
    UnexpectedEof { line: usize },

    /// A token appeared where it is not allowed
    #[error("Unexpected '{found}' at line {line}")]
    UnexpectedToken { found: char, line: usize },

    /// A closing brace without a matching opening brace
    #[error("Unbalanced '}}' at line {line}")]
    Unbalanced { line: usize },

    /// A path value that is not a single file or directory name
    #[error("Invalid {key} '{value}': expected a single path component")]
    InvalidPath { key: &'static str, value: String },

    /// A required key is absent
    #[error("Missing key: {0}")]
    MissingKey(String),
}

/// Specialized Result type for manifest operations
pub type ManifestResult<T> = Result<T, ManifestError>;
