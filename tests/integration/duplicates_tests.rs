use dupecat::catalog::Catalog;
use dupecat::commands;
use dupecat::error::ExitCode;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const NAMES: [&str; 4] = [
    "bar-1786396036.txt",
    "bambam/foo-756381984.txt",
    "bambam/baz.txt",
    "bambam/quix-1786396036.txt",
];

/// Catalog whose rows point into a temp dir; files are not created.
fn setup() -> (TempDir, PathBuf, Vec<String>) {
    let dir = tempdir().unwrap();
    let paths: Vec<String> = NAMES
        .iter()
        .map(|name| dir.path().join(name).to_str().unwrap().to_string())
        .collect();
    let rows = [
        format!("{},756381984,464f1ce84fed3d6837db4b810462f8de", paths[0]),
        format!("{},1786396036,4d09a656f20fee1beb093f30c7ec504c", paths[1]),
        format!("{},756381984,464f1ce84fed3d6837db4b810462f8de", paths[2]),
        format!("{},123,788b62828f73d4bac70088ea91c90ef5", paths[3]),
    ];
    let db = dir.path().join("files.csv");
    fs::write(&db, rows.join("\n")).unwrap();
    (dir, db, paths)
}

fn run(db: &Path, min_length: usize, input: &str) -> (ExitCode, Vec<String>) {
    yansi::disable();
    let catalog = Catalog::open(db);
    let mut out = Vec::new();
    let code = commands::duplicates(&catalog, min_length, 100, &mut input.as_bytes(), &mut out)
        .unwrap();
    let lines = String::from_utf8(out).unwrap().lines().map(String::from).collect();
    (code, lines)
}

#[test]
fn test_duplicates_by_size_and_hash() {
    let (_dir, db, paths) = setup();
    let (code, lines) = run(&db, 15, "");

    assert_eq!(code, ExitCode::Success);
    assert_eq!(lines[0], "Duplicates found: 2 (1 / 1) - Size and hash");
    assert!(lines[1].contains(&paths[2]));
    assert!(lines[2].contains(&paths[0]));
    assert_eq!(lines[3], "Delete any files? (comma separated list of numbers)");
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_duplicates_by_partial_name_match() {
    let (_dir, db, paths) = setup();
    let (_, lines) = run(&db, 10, "");

    assert_eq!(lines[4], "Duplicates found: 2 (1 / 1) - Search term");
    assert!(lines[5].contains(&paths[3]));
    assert!(lines[6].contains(&paths[0]));
}

#[test]
fn test_deleting_missing_file_is_reported() {
    let (_dir, db, paths) = setup();
    let (code, lines) = run(&db, 15, "1\n");

    assert_eq!(code, ExitCode::PartialSuccess);
    assert_eq!(lines[4], format!("Deleting {}", paths[2]));
    assert!(lines[5].starts_with(&format!("Unable to delete file: {}, err:", paths[2])));
}

#[test]
fn test_delete_selected_duplicate() {
    let (_dir, db, paths) = setup();
    fs::write(&paths[0], b"").unwrap();

    let (code, lines) = run(&db, 15, "2\n");

    assert_eq!(code, ExitCode::Success);
    assert_eq!(lines[4], format!("Deleting {}", paths[0]));
    assert!(!Path::new(&paths[0]).exists());

    // The record is gone from the rewritten catalog
    let content = fs::read_to_string(&db).unwrap();
    assert_eq!(content.lines().count(), 3);
    assert!(!content.contains(&format!("{},", paths[0])));
}

#[test]
fn test_invalid_selection_is_skipped() {
    let (_dir, db, _paths) = setup();
    let (code, lines) = run(&db, 15, "x, 7\n");

    assert_eq!(code, ExitCode::Success);
    assert_eq!(lines[4], "Invalid number: x, skipping...");
    assert_eq!(lines[5], "Invalid index: 7, skipping...");
    assert_eq!(fs::read_to_string(&db).unwrap().lines().count(), 4);
}
