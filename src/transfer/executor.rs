/*!
 * Executes a copy plan against the filesystem
 */

use std::fs::{self, File};
use std::io::{self, Read, Write};

use tracing::{debug, info};

use super::progress::{CopyProgress, ProgressReporter};
use crate::error::{GlmError, Result, ResultExt};
use crate::types::{CopyPlan, DirNode, FileNode, PlanNode};
use crate::utils::is_satisfied;

/// Size of each read/write chunk when streaming a file
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// What an execution actually did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    /// Files streamed to the destination
    pub files_copied: u64,
    /// Files already satisfied at execution time
    pub files_skipped: u64,
    /// Directories created at the destination
    pub dirs_created: u64,
    /// Bytes written to the destination
    pub bytes_copied: u64,
}

/// Walks a plan top-down and performs the copies
#[derive(Debug, Clone)]
pub struct PlanExecutor {
    chunk_size: usize,
}

impl Default for PlanExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

/// Per-execution state threaded through the traversal
struct ExecutionContext<'a, R: ?Sized> {
    reporter: &'a R,
    buffer: Vec<u8>,
    files_visited: u64,
    total_files: u64,
    summary: ExecutionSummary,
}

impl PlanExecutor {
    /// Create an executor streaming in chunks of `chunk_size` bytes
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Execute `plan`, reporting every chunk to `reporter`
    ///
    /// The first read or write failure aborts the whole execution. Files
    /// copied before the failure stay on disk.
    pub fn execute<R>(&self, plan: &CopyPlan, reporter: &R) -> Result<ExecutionSummary>
    where
        R: ProgressReporter + ?Sized,
    {
        let mut ctx = ExecutionContext {
            reporter,
            buffer: vec![0; self.chunk_size],
            files_visited: 0,
            total_files: plan.visited_file_count(),
            summary: ExecutionSummary::default(),
        };

        self.execute_directory(&plan.root, &mut ctx)?;
        if let Some(manifest) = &plan.manifest {
            self.execute_file(manifest, &mut ctx)?;
        }

        info!(
            "Copied {} files ({} bytes), skipped {}, created {} directories",
            ctx.summary.files_copied,
            ctx.summary.bytes_copied,
            ctx.summary.files_skipped,
            ctx.summary.dirs_created
        );
        Ok(ctx.summary)
    }

    fn execute_directory<R>(&self, dir: &DirNode, ctx: &mut ExecutionContext<'_, R>) -> Result<()>
    where
        R: ProgressReporter + ?Sized,
    {
        if !dir.destination.exists() {
            fs::create_dir(&dir.destination).at_path(&dir.destination)?;
            ctx.summary.dirs_created += 1;
            debug!("Created {}", dir.destination.display());
        }

        for child in &dir.children {
            match child {
                PlanNode::Directory(sub) => self.execute_directory(sub, ctx)?,
                PlanNode::File(file) => self.execute_file(file, ctx)?,
            }
        }

        Ok(())
    }

    fn execute_file<R>(&self, file: &FileNode, ctx: &mut ExecutionContext<'_, R>) -> Result<()>
    where
        R: ProgressReporter + ?Sized,
    {
        ctx.files_visited += 1;

        // The plan may be stale; trust the destination as it is now.
        if is_satisfied(&file.destination, file.size) {
            ctx.summary.files_skipped += 1;
            return Ok(());
        }

        let mut reader = File::open(&file.source).at_path(&file.source)?;
        let mut writer = File::create(&file.destination).at_path(&file.destination)?;

        let mut progress = CopyProgress {
            chunk_bytes: 0,
            file_index: ctx.files_visited,
            total_files: ctx.total_files,
            file_name: file.name.clone(),
            file_size: file.size,
        };

        loop {
            let read = match reader.read(&mut ctx.buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(GlmError::PathIo {
                        path: file.source.clone(),
                        source,
                    })
                }
            };
            writer
                .write_all(&ctx.buffer[..read])
                .at_path(&file.destination)?;

            progress.chunk_bytes = read as u64;
            ctx.summary.bytes_copied += read as u64;
            ctx.reporter.report(&progress);
        }

        writer.flush().at_path(&file.destination)?;
        ctx.summary.files_copied += 1;
        debug!("Copied {}", file.destination.display());
        Ok(())
    }
}
