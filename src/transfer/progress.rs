/*!
 * Progress reporting for plan execution
 */

use crate::utils::format_file_size;

/// Trait for receiving progress while a plan executes
///
/// Called once per chunk written, in the order the chunks were copied.
pub trait ProgressReporter {
    /// Called with progress information after each chunk
    fn report(&self, progress: &CopyProgress);
}

/// Progress information for one chunk of a file copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyProgress {
    /// Bytes written by this chunk (not cumulative)
    pub chunk_bytes: u64,
    /// 1-based index of the file being copied among all visited files
    pub file_index: u64,
    /// Number of files the executor will visit
    pub total_files: u64,
    /// Name of the file being copied
    pub file_name: String,
    /// Planned size of the file being copied
    pub file_size: u64,
}

impl CopyProgress {
    /// Get a formatted string of the file size
    pub fn formatted_size(&self) -> String {
        format_file_size(self.file_size)
    }

    /// `index/total` position string
    pub fn position(&self) -> String {
        format!("{}/{}", self.file_index, self.total_files)
    }
}

// Implement ProgressReporter for closures
impl<F> ProgressReporter for F
where
    F: Fn(&CopyProgress),
{
    fn report(&self, progress: &CopyProgress) {
        self(progress)
    }
}

/// Reporter that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _progress: &CopyProgress) {}
}
