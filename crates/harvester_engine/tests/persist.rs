use std::fs;

use harvester_engine::{probe_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn probe_accepts_a_writable_directory_without_leaving_files() {
    let temp = TempDir::new().unwrap();
    probe_output_dir(temp.path()).unwrap();
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn probe_never_creates_a_missing_directory() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("out");

    let err = probe_output_dir(&missing).unwrap_err();
    assert!(matches!(err, PersistError::OutputDir(_)));
    assert!(!missing.exists());
}

#[test]
fn probe_rejects_a_plain_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("photos");
    fs::write(&file, "x").unwrap();

    assert!(matches!(
        probe_output_dir(&file),
        Err(PersistError::OutputDir(_))
    ));
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("owl_1.png", b"first").unwrap();
    assert_eq!(first.file_name().unwrap(), "owl_1.png");
    assert_eq!(fs::read(&first).unwrap(), b"first");

    let second = writer.write("owl_1.png", b"second").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"second");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("owl_1.png", b"data").is_err());
    assert!(!file_path.with_file_name("owl_1.png").exists());
}

#[test]
fn discard_removes_and_tolerates_missing_files() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    let stored = writer.write("owl_2.jpg", b"jpeg").unwrap();

    writer.discard(&stored).unwrap();
    assert!(!stored.exists());
    writer.discard(&stored).unwrap();
}
