use dupecat::catalog::Catalog;
use dupecat::commands;
use dupecat::error::ExitCode;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Two roots, each holding `duplicate.txt` (same bytes) and `bar.txt`
/// (differing only in case).
fn setup() -> (TempDir, Vec<String>) {
    let dir = tempdir().unwrap();
    let mut roots = Vec::new();
    for (name, bar) in [("fs1", "Bar"), ("fs2", "bar")] {
        let root = dir.path().join(name);
        fs::create_dir(&root).unwrap();
        fs::write(root.join("duplicate.txt"), b"0.839217").unwrap();
        fs::write(root.join("bar.txt"), bar).unwrap();
        roots.push(root.to_str().unwrap().to_string());
    }
    (dir, roots)
}

fn run_scan(db: &Path, roots: &[String]) -> Vec<String> {
    let catalog = Catalog::open(db);
    let mut out = Vec::new();
    let code = commands::scan(&catalog, roots, &mut out).unwrap();
    assert_eq!(code, ExitCode::Success);
    String::from_utf8(out).unwrap().lines().map(String::from).collect()
}

fn run_stats(db: &Path) -> Vec<String> {
    let catalog = Catalog::open(db);
    let mut out = Vec::new();
    commands::stats(&catalog, 15, &mut out).unwrap();
    String::from_utf8(out).unwrap().lines().map(String::from).collect()
}

#[test]
fn test_scan_and_stats() {
    let (dir, roots) = setup();
    let db = dir.path().join("files.csv");

    let lines = run_scan(&db, &roots);
    assert_eq!(
        lines,
        vec![
            format!("root: {}, 2 found files, 0 skipped, 2 created, 0 deleted", roots[0]),
            format!("root: {}, 2 found files, 0 skipped, 2 created, 0 deleted", roots[1]),
        ]
    );

    let stats = run_stats(&db);
    assert_eq!(stats[0], "Total records: 4");
    assert_eq!(stats[1], "Total unique sizes: 2");
    assert_eq!(stats[2], "Total unique search terms: 2");
    assert_eq!(stats[3], "Total unique hashes: 3");
    assert_eq!(stats[4], "Sizes with multiple records: 2");
    assert_eq!(stats[5], "Hashes with multiple records: 1");
    assert_eq!(stats[6], "");
    assert_eq!(stats[7], "Search term length distribution:");
}

#[test]
fn test_rescan_is_idempotent() {
    let (dir, roots) = setup();
    let db = dir.path().join("files.csv");

    run_scan(&db, &roots);
    let before = fs::read_to_string(&db).unwrap();
    let lines = run_scan(&db, &roots);

    for (line, root) in lines.iter().zip(&roots) {
        assert_eq!(
            line,
            &format!("root: {}, 2 found files, 2 skipped, 0 created, 0 deleted", root)
        );
    }
    assert_eq!(fs::read_to_string(&db).unwrap(), before);
}

#[test]
fn test_rescan_removes_deleted_files() {
    let (dir, roots) = setup();
    let db = dir.path().join("files.csv");
    run_scan(&db, &roots);

    fs::remove_file(Path::new(&roots[0]).join("bar.txt")).unwrap();
    let lines = run_scan(&db, &roots[..1]);

    assert_eq!(
        lines[0],
        format!("root: {}, 1 found files, 1 skipped, 0 created, 1 deleted", roots[0])
    );
    assert_eq!(run_stats(&db)[0], "Total records: 3");
}

#[test]
fn test_rescan_of_removed_root_drops_its_records() {
    let (dir, roots) = setup();
    let db = dir.path().join("files.csv");
    run_scan(&db, &roots);

    fs::remove_dir_all(&roots[0]).unwrap();
    let lines = run_scan(&db, &roots);

    assert_eq!(
        lines[0],
        format!("root: {}, 0 found files, 0 skipped, 0 created, 2 deleted", roots[0])
    );
    assert_eq!(
        lines[1],
        format!("root: {}, 2 found files, 2 skipped, 0 created, 0 deleted", roots[1])
    );
    assert_eq!(run_stats(&db)[0], "Total records: 2");
}

#[test]
fn test_sibling_root_with_shared_prefix_is_untouched() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    let data2 = dir.path().join("data2");
    fs::create_dir(&data).unwrap();
    fs::create_dir(&data2).unwrap();
    fs::write(data.join("a.txt"), b"a").unwrap();
    fs::write(data2.join("b.txt"), b"b").unwrap();

    let db = dir.path().join("files.csv");
    let data = data.to_str().unwrap().to_string();
    let data2 = data2.to_str().unwrap().to_string();
    run_scan(&db, &[data.clone(), data2]);

    fs::remove_file(Path::new(&data).join("a.txt")).unwrap();
    let lines = run_scan(&db, &[data]);

    assert!(lines[0].ends_with("1 deleted"));
    assert_eq!(run_stats(&db)[0], "Total records: 1");
}

#[test]
fn test_catalog_file_is_sorted_headerless_csv() {
    let (dir, roots) = setup();
    let db = dir.path().join("files.csv");
    run_scan(&db, &roots);

    let content = fs::read_to_string(&db).unwrap();
    let paths: Vec<&str> = content
        .lines()
        .map(|line| line.split(',').next().unwrap())
        .collect();
    let mut sorted = paths.clone();
    sorted.sort_unstable();

    assert_eq!(paths.len(), 4);
    assert_eq!(paths, sorted);
    for line in content.lines() {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 3);
        assert!(fields[1].parse::<u64>().is_ok());
        assert_eq!(fields[2].len(), 64);
    }
}

#[test]
fn test_scan_missing_catalog_starts_empty_and_unreadable_is_fatal() {
    let (dir, roots) = setup();

    // A missing catalog is created
    let db = dir.path().join("new.csv");
    assert!(!db.exists());
    run_scan(&db, &roots);
    assert!(db.exists());

    // A directory in place of the catalog cannot be read
    let catalog = Catalog::open(dir.path());
    let err = commands::scan(&catalog, &roots, &mut Vec::new()).unwrap_err();
    assert!(format!("{:#}", err).contains("Unable to read DB file"));
}

#[test]
fn test_load_tolerates_malformed_rows() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("files.csv");
    fs::write(
        &db,
        "/a/x.txt,10,aaaa\n\n/a/y.txt,ten,bbbb\n/a/z.txt,3\n/a/w.txt,10,aaaa\n",
    )
    .unwrap();

    let catalog = Catalog::open(&db);
    let report = catalog.load().unwrap();

    assert_eq!(report.loaded, 2);
    assert_eq!(report.malformed.len(), 2);
    assert!(catalog.is_consistent().unwrap());
}
