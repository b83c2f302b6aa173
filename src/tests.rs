/*!
 * End-to-end tests for planning and executing package transfers
 */

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use filetime::{set_file_mtime, FileTime};
use tempfile::{tempdir, TempDir};

use crate::error::GlmError;
use crate::library::LibraryLayout;
use crate::manifest::ManifestError;
use crate::transfer::{NoProgress, Transfer, TransferRequest, DEFAULT_CHUNK_SIZE};
use crate::types::{CopyPlan, FileAction, PlanNode};

const MANIFEST: &str = "appmanifest_4000.acf";

// Helper holding a source and a destination library
struct Libraries {
    _tmp: TempDir,
    source: PathBuf,
    destination: PathBuf,
}

impl Libraries {
    fn source_install(&self) -> PathBuf {
        self.source.join("steamapps").join("common").join("Game")
    }

    fn dest_install(&self) -> PathBuf {
        self.destination.join("steamapps").join("common").join("Game")
    }

    fn request(&self) -> TransferRequest {
        TransferRequest::new(&self.source, &self.destination, "Game", MANIFEST)
    }
}

fn write_bytes(path: &Path, len: usize) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(&vec![b'x'; len])?;
    Ok(())
}

// Source library with common/Game/a.bin (10 bytes) and common/Game/sub/b.bin (5 bytes)
fn setup_libraries() -> io::Result<Libraries> {
    let tmp = tempdir()?;
    let source = tmp.path().join("source");
    let destination = tmp.path().join("destination");

    let libs = Libraries {
        source,
        destination,
        _tmp: tmp,
    };

    write_bytes(&libs.source_install().join("a.bin"), 10)?;
    write_bytes(&libs.source_install().join("sub").join("b.bin"), 5)?;
    fs::write(
        libs.source.join("steamapps").join(MANIFEST),
        "\"AppState\"\n{\n\t\"appid\"\t\"4000\"\n\t\"name\"\t\"Game\"\n\t\"installdir\"\t\"Game\"\n}\n",
    )?;
    fs::create_dir_all(libs.destination.join("steamapps").join("common"))?;

    Ok(libs)
}

fn transfer() -> Transfer {
    Transfer::new(LibraryLayout::default(), DEFAULT_CHUNK_SIZE)
}

fn count_copy_nodes(plan: &CopyPlan) -> u64 {
    plan.root
        .files()
        .iter()
        .filter(|f| f.action == FileAction::Copy)
        .count() as u64
}

// Scenario A: empty destination receives everything
#[test]
fn test_copy_into_empty_destination() -> io::Result<()> {
    let libs = setup_libraries()?;
    let transfer = transfer();
    let request = libs.request();

    let plan = transfer.plan(&request)?;
    assert_eq!(plan.files_requiring_copy, 2);
    assert_eq!(plan.bytes_requiring_copy, 15);
    assert_eq!(plan.total_source_bytes, 15);

    transfer.execute(&request, &plan, &NoProgress)?;

    assert_eq!(fs::metadata(libs.dest_install().join("a.bin"))?.len(), 10);
    assert_eq!(
        fs::metadata(libs.dest_install().join("sub").join("b.bin"))?.len(),
        5
    );
    assert_eq!(
        fs::read_to_string(libs.destination.join("steamapps").join(MANIFEST))?,
        fs::read_to_string(libs.source.join("steamapps").join(MANIFEST))?
    );

    Ok(())
}

// Scenario B: matching file is left untouched
#[test]
fn test_matching_file_is_skipped() -> io::Result<()> {
    let libs = setup_libraries()?;
    let existing = libs.dest_install().join("a.bin");
    write_bytes(&existing, 10)?;
    let old = FileTime::from_unix_time(1_000_000_000, 0);
    set_file_mtime(&existing, old)?;

    let transfer = transfer();
    let request = libs.request();
    let plan = transfer.plan(&request)?;

    assert_eq!(plan.files_requiring_copy, 1);
    assert_eq!(plan.bytes_requiring_copy, 5);
    let actions: Vec<(String, FileAction)> = plan
        .root
        .files()
        .into_iter()
        .map(|f| (f.name.clone(), f.action))
        .collect();
    assert_eq!(
        actions,
        vec![
            ("a.bin".to_string(), FileAction::Skip),
            ("b.bin".to_string(), FileAction::Copy),
        ]
    );

    let summary = transfer.execute(&request, &plan, &NoProgress)?;
    assert_eq!(summary.files_skipped, 1);

    let mtime = FileTime::from_last_modification_time(&fs::metadata(&existing)?);
    assert_eq!(mtime, old);
    assert!(libs.dest_install().join("sub").join("b.bin").is_file());

    Ok(())
}

// Scenario C: size mismatch is overwritten
#[test]
fn test_size_mismatch_is_overwritten() -> io::Result<()> {
    let libs = setup_libraries()?;
    let existing = libs.dest_install().join("a.bin");
    write_bytes(&existing, 3)?;

    let transfer = transfer();
    let request = libs.request();
    let plan = transfer.plan(&request)?;

    let a = plan
        .root
        .files()
        .into_iter()
        .find(|f| f.name == "a.bin")
        .map(|f| f.action);
    assert_eq!(a, Some(FileAction::Copy));

    transfer.execute(&request, &plan, &NoProgress)?;
    assert_eq!(fs::metadata(&existing)?.len(), 10);

    Ok(())
}

// Scenario D: same library on both sides is rejected before reading anything
#[test]
fn test_same_library_is_rejected() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("does-not-exist");
    let request = TransferRequest::new(&missing, &missing, "Game", MANIFEST);

    let err = transfer().plan(&request).unwrap_err();
    assert!(matches!(err, GlmError::InvalidLibraryPair(_)));
    assert!(err.is_recoverable());

    let with_slash = TransferRequest::new(
        tmp.path().join("lib"),
        tmp.path().join("lib").join("."),
        "Game",
        MANIFEST,
    );
    assert!(matches!(
        transfer().plan(&with_slash),
        Err(GlmError::InvalidLibraryPair(_))
    ));
}

// Scenario E: a read failure stops the transfer before later files
#[test]
fn test_read_failure_aborts_remaining_files() -> io::Result<()> {
    let libs = setup_libraries()?;
    fs::remove_dir_all(libs.source_install())?;
    write_bytes(&libs.source_install().join("1.bin"), 4)?;
    write_bytes(&libs.source_install().join("2.bin"), 4)?;
    write_bytes(&libs.source_install().join("3.bin"), 4)?;

    let transfer = transfer();
    let request = libs.request();
    let plan = transfer.plan(&request)?;
    assert_eq!(plan.files_requiring_copy, 3);

    fs::remove_file(libs.source_install().join("2.bin"))?;

    let err = transfer.execute(&request, &plan, &NoProgress).unwrap_err();
    match err {
        GlmError::PathIo { path, source } => {
            assert_eq!(path, libs.source_install().join("2.bin"));
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {}", other),
    }

    assert_eq!(fs::metadata(libs.dest_install().join("1.bin"))?.len(), 4);
    assert!(!libs.dest_install().join("3.bin").exists());
    assert!(!libs.destination.join("steamapps").join(MANIFEST).exists());

    Ok(())
}

// Second plan after a full run has nothing left to copy
#[test]
fn test_replanning_after_copy_is_idempotent() -> io::Result<()> {
    let libs = setup_libraries()?;
    let transfer = transfer();
    let request = libs.request();

    let first = transfer.plan(&request)?;
    transfer.execute(&request, &first, &NoProgress)?;

    let second = transfer.plan(&request)?;
    assert_eq!(second.files_requiring_copy, 0);
    assert_eq!(second.bytes_requiring_copy, 0);
    assert!(second.is_satisfied());
    assert_eq!(second.total_source_bytes, first.total_source_bytes);

    let summary = transfer.execute(&request, &second, &NoProgress)?;
    assert_eq!(summary.bytes_copied as usize, fs::read(libs.source.join("steamapps").join(MANIFEST))?.len());

    Ok(())
}

// Totals agree with the nodes and every source directory lands at the destination
#[test]
fn test_conservation_and_directory_completeness() -> io::Result<()> {
    let libs = setup_libraries()?;
    fs::create_dir_all(libs.source_install().join("empty").join("nested"))?;
    write_bytes(&libs.source_install().join("sub").join("deeper").join("c.bin"), 7)?;
    write_bytes(&libs.dest_install().join("sub").join("deeper").join("c.bin"), 7)?;

    let transfer = transfer();
    let request = libs.request();
    let plan = transfer.plan(&request)?;

    assert!(plan.bytes_requiring_copy <= plan.total_source_bytes);
    assert_eq!(plan.files_requiring_copy, count_copy_nodes(&plan));
    assert_eq!(plan.file_count, 3);

    transfer.execute(&request, &plan, &NoProgress)?;

    for dir in plan.root.directories() {
        let relative = dir.source.strip_prefix(libs.source_install()).unwrap();
        assert!(
            libs.dest_install().join(relative).is_dir(),
            "missing {}",
            relative.display()
        );
    }
    assert!(libs.dest_install().join("empty").join("nested").is_dir());

    Ok(())
}

// Missing install directory or manifest is reported as not found
#[test]
fn test_missing_source_paths() -> io::Result<()> {
    let libs = setup_libraries()?;
    let transfer = transfer();

    let wrong_dir = TransferRequest::new(&libs.source, &libs.destination, "Other", MANIFEST);
    assert!(matches!(
        transfer.plan(&wrong_dir),
        Err(GlmError::NotFound(_))
    ));

    let wrong_manifest =
        TransferRequest::new(&libs.source, &libs.destination, "Game", "appmanifest_1.acf");
    assert!(matches!(
        transfer.plan(&wrong_manifest),
        Err(GlmError::NotFound(_))
    ));

    Ok(())
}

// Manifest is carried as a trailing zero-size node outside the totals
#[test]
fn test_manifest_node() -> io::Result<()> {
    let libs = setup_libraries()?;
    let plan = transfer().plan(&libs.request())?;

    let manifest = plan.manifest.as_ref().unwrap();
    assert_eq!(manifest.size, 0);
    assert_eq!(manifest.action, FileAction::Copy);
    assert_eq!(
        manifest.destination,
        libs.destination.join("steamapps").join(MANIFEST)
    );
    assert_eq!(plan.visited_file_count(), 3);
    assert!(plan
        .root
        .children
        .iter()
        .all(|c| !matches!(c, PlanNode::File(f) if f.name == MANIFEST)));

    Ok(())
}

// Install directory and manifest names cannot point outside the libraries
#[test]
fn test_escaping_names_are_rejected() -> io::Result<()> {
    let libs = setup_libraries()?;
    let outside = libs.source.parent().unwrap().join("outside");
    write_bytes(&outside.join("loot.bin"), 9)?;
    let transfer = transfer();

    let absolute = outside.to_string_lossy().into_owned();
    for install_dir in [absolute.as_str(), "../../../outside", "..", ""] {
        let request = TransferRequest::new(&libs.source, &libs.destination, install_dir, MANIFEST);
        assert!(
            matches!(
                transfer.plan(&request),
                Err(GlmError::Manifest(ManifestError::InvalidPath { .. }))
            ),
            "planned {:?}",
            install_dir
        );
    }

    let request = TransferRequest::new(
        &libs.source,
        &libs.destination,
        "Game",
        format!("../steamapps/{}", MANIFEST),
    );
    assert!(matches!(
        transfer.plan(&request),
        Err(GlmError::Manifest(ManifestError::InvalidPath { .. }))
    ));
    assert!(!libs.destination.join("outside").exists());

    Ok(())
}
