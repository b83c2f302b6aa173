/*!
 * Core types and data structures for the copy plan
 */

use std::path::PathBuf;

/// What the executor should do with a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// Destination already has a file of the same size
    Skip,
    /// Destination is missing or differs in size
    Copy,
}

/// Represents a directory in the copy plan
#[derive(Debug, Clone)]
pub struct DirNode {
    /// Directory name relative to its parent
    pub name: String,
    /// Absolute source path
    pub source: PathBuf,
    /// Absolute destination path
    pub destination: PathBuf,
    /// Entries found under `source` at plan time, in enumeration order
    pub children: Vec<PlanNode>,
    /// Destination did not exist at plan time
    pub must_create: bool,
}

/// Represents a plain file in the copy plan
#[derive(Debug, Clone)]
pub struct FileNode {
    /// File name relative to its parent
    pub name: String,
    /// Absolute source path
    pub source: PathBuf,
    /// Absolute destination path
    pub destination: PathBuf,
    /// Source size in bytes
    pub size: u64,
    /// Decision taken at plan time
    pub action: FileAction,
}

/// A node of the copy plan tree
#[derive(Debug, Clone)]
pub enum PlanNode {
    /// Directory node
    Directory(DirNode),
    /// File node
    File(FileNode),
}

impl DirNode {
    /// Every file node below this directory, depth-first in plan order
    pub fn files(&self) -> Vec<&FileNode> {
        let mut out = Vec::new();
        collect_files(self, &mut out);
        out
    }

    /// Every directory node below and including this one
    pub fn directories(&self) -> Vec<&DirNode> {
        let mut out = vec![self];
        for child in &self.children {
            if let PlanNode::Directory(dir) = child {
                out.extend(dir.directories());
            }
        }
        out
    }
}

fn collect_files<'a>(dir: &'a DirNode, out: &mut Vec<&'a FileNode>) {
    for child in &dir.children {
        match child {
            PlanNode::Directory(sub) => collect_files(sub, out),
            PlanNode::File(file) => out.push(file),
        }
    }
}

/// The full plan for one package transfer
#[derive(Debug, Clone)]
pub struct CopyPlan {
    /// Install directory of the package
    pub root: DirNode,
    /// Manifest file, processed after the tree with its size forced to 0
    pub manifest: Option<FileNode>,
    /// Sum of every source file size in the tree
    pub total_source_bytes: u64,
    /// Sum of the sizes of files marked [`FileAction::Copy`]
    pub bytes_requiring_copy: u64,
    /// Number of files marked [`FileAction::Copy`]
    pub files_requiring_copy: u64,
    /// Number of file nodes in the tree
    pub file_count: u64,
}

/// Totals shown to the user before confirming a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanSummary {
    pub total_bytes: u64,
    pub bytes_to_copy: u64,
    pub file_count: u64,
}

impl CopyPlan {
    /// Summary for confirmation prompts
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            total_bytes: self.total_source_bytes,
            bytes_to_copy: self.bytes_requiring_copy,
            file_count: self.files_requiring_copy,
        }
    }

    /// Number of file nodes the executor will visit, manifest included
    pub fn visited_file_count(&self) -> u64 {
        self.file_count + u64::from(self.manifest.is_some())
    }

    /// Whether nothing in the tree needs to be transferred
    pub fn is_satisfied(&self) -> bool {
        self.files_requiring_copy == 0
    }
}
