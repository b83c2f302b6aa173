/*!
 * Builds the copy plan for a package install tree
 *
 * The planner only reads the filesystem. A file is considered already
 * transferred when the destination holds a file of the same byte size; no
 * content is read and modification times are ignored, so a damaged
 * destination file of the right size is not detected.
 */

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::error::{GlmError, Result};
use crate::types::{CopyPlan, DirNode, FileAction, FileNode, PlanNode};
use crate::utils::is_satisfied;

/// Decide what to do with a file of `size` bytes headed for `destination`
pub fn decide(destination: &Path, size: u64) -> FileAction {
    if is_satisfied(destination, size) {
        FileAction::Skip
    } else {
        FileAction::Copy
    }
}

#[derive(Debug, Default)]
struct Totals {
    total_source_bytes: u64,
    bytes_requiring_copy: u64,
    files_requiring_copy: u64,
    file_count: u64,
}

impl Totals {
    fn record(&mut self, file: &FileNode) {
        self.file_count += 1;
        self.total_source_bytes += file.size;
        if file.action == FileAction::Copy {
            self.files_requiring_copy += 1;
            self.bytes_requiring_copy += file.size;
        }
    }
}

/// Recursive planner mirroring a source tree onto a destination tree
#[derive(Debug, Clone, Copy, Default)]
pub struct TreePlanner;

impl TreePlanner {
    pub fn new() -> Self {
        Self
    }

    /// Walk `source_root` and compare it against `dest_root`
    pub fn build_plan(&self, source_root: &Path, dest_root: &Path) -> Result<CopyPlan> {
        match fs::metadata(source_root) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => crate::bail!(NotFound, "not a directory: {}", source_root.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                crate::bail!(NotFound, "{}", source_root.display())
            }
            Err(source) => {
                return Err(GlmError::PathIo {
                    path: source_root.to_path_buf(),
                    source,
                })
            }
        }

        let name = source_root
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let mut totals = Totals::default();
        let root = self.plan_directory(name, source_root, dest_root, &mut totals)?;

        debug!(
            "Planned {}: {} files, {} bytes, {} files ({} bytes) to copy",
            source_root.display(),
            totals.file_count,
            totals.total_source_bytes,
            totals.files_requiring_copy,
            totals.bytes_requiring_copy
        );

        Ok(CopyPlan {
            root,
            manifest: None,
            total_source_bytes: totals.total_source_bytes,
            bytes_requiring_copy: totals.bytes_requiring_copy,
            files_requiring_copy: totals.files_requiring_copy,
            file_count: totals.file_count,
        })
    }

    /// Plan a directory and everything below it
    fn plan_directory(
        &self,
        name: String,
        source: &Path,
        destination: &Path,
        totals: &mut Totals,
    ) -> Result<DirNode> {
        let mut children = Vec::new();

        let entries = WalkDir::new(source)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in entries {
            let entry = entry?;
            let entry_name = entry.file_name().to_string_lossy().to_string();
            let entry_destination = destination.join(entry.file_name());

            if entry.file_type().is_dir() {
                let dir = self.plan_directory(entry_name, entry.path(), &entry_destination, totals)?;
                children.push(PlanNode::Directory(dir));
            } else if entry.file_type().is_file() {
                let size = entry.metadata()?.len();
                let action = decide(&entry_destination, size);
                trace!("{:?} {}", action, entry.path().display());

                let file = FileNode {
                    name: entry_name,
                    source: entry.path().to_path_buf(),
                    destination: entry_destination,
                    size,
                    action,
                };
                totals.record(&file);
                children.push(PlanNode::File(file));
            } else {
                warn!("Ignoring special file {}", entry.path().display());
            }
        }

        Ok(DirNode {
            name,
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            children,
            must_create: !destination.is_dir(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write(path: &Path, len: usize) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, vec![7u8; len]).unwrap();
    }

    fn names(dir: &DirNode) -> Vec<String> {
        dir.children
            .iter()
            .map(|c| match c {
                PlanNode::Directory(d) => format!("{}/", d.name),
                PlanNode::File(f) => f.name.clone(),
            })
            .collect()
    }

    #[test]
    fn test_children_mirror_source_in_name_order() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src");
        write(&src.join("b.bin"), 1);
        write(&src.join("a.bin"), 2);
        write(&src.join("sub").join("c.bin"), 3);
        fs::create_dir_all(src.join("empty")).unwrap();

        let plan = TreePlanner::new()
            .build_plan(&src, &tmp.path().join("dst"))
            .unwrap();

        assert_eq!(names(&plan.root), vec!["a.bin", "b.bin", "empty/", "sub/"]);
        assert!(plan.root.must_create);
        let empty = plan
            .root
            .directories()
            .into_iter()
            .find(|d| d.name == "empty")
            .unwrap();
        assert!(empty.children.is_empty());
        assert_eq!(empty.destination, tmp.path().join("dst").join("empty"));
        assert_eq!(plan.file_count, 3);
        assert_eq!(plan.total_source_bytes, 6);
    }

    #[test]
    fn test_skip_only_on_equal_size() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write(&src.join("same.bin"), 10);
        write(&src.join("short.bin"), 10);
        write(&src.join("missing.bin"), 4);
        write(&dst.join("same.bin"), 10);
        write(&dst.join("short.bin"), 3);
        fs::create_dir_all(dst.join("dir_not_file.bin")).unwrap();
        write(&src.join("dir_not_file.bin"), 0);

        let plan = TreePlanner::new().build_plan(&src, &dst).unwrap();
        let actions: Vec<(String, FileAction)> = plan
            .root
            .files()
            .into_iter()
            .map(|f| (f.name.clone(), f.action))
            .collect();

        assert_eq!(
            actions,
            vec![
                ("dir_not_file.bin".to_string(), FileAction::Copy),
                ("missing.bin".to_string(), FileAction::Copy),
                ("same.bin".to_string(), FileAction::Skip),
                ("short.bin".to_string(), FileAction::Copy),
            ]
        );
        assert!(!plan.root.must_create);
        assert_eq!(plan.total_source_bytes, 24);
        assert_eq!(plan.bytes_requiring_copy, 14);
        assert_eq!(plan.files_requiring_copy, 3);
    }

    #[test]
    fn test_missing_source_is_not_found() {
        let tmp = tempdir().unwrap();
        let err = TreePlanner::new()
            .build_plan(&tmp.path().join("nope"), &PathBuf::from("/unused"))
            .unwrap_err();
        assert!(matches!(err, GlmError::NotFound(_)));
    }

    #[test]
    fn test_planning_does_not_touch_destination() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src");
        write(&src.join("deep").join("er").join("f.bin"), 5);
        let dst = tmp.path().join("dst");

        TreePlanner::new().build_plan(&src, &dst).unwrap();
        assert!(!dst.exists());
    }
}
