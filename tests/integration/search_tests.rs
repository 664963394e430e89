use dupecat::catalog::Catalog;
use dupecat::commands;
use dupecat::search::SearchMode;
use std::fs;
use tempfile::{tempdir, TempDir};

const FILES: [&str; 4] = [
    "bambam/foo-756381984.txt",
    "bambam/bar-1786396036.txt",
    "bambam/baz.txt",
    "bambam/quix-1786396036.txt",
];

fn setup() -> (TempDir, Catalog) {
    let dir = tempdir().unwrap();
    let db = dir.path().join("files.csv");
    let rows = [
        format!("{},756381984,464f1ce84fed3d6837db4b810462f8de", FILES[0]),
        format!("{},1786396036,4d09a656f20fee1beb093f30c7ec504c", FILES[1]),
        format!("{},756381984,464f1ce84fed3d6837db4b810462f8de", FILES[2]),
        format!("{},123,788b62828f73d4bac70088ea91c90ef5", FILES[3]),
    ];
    fs::write(&db, rows.join("\n\n")).unwrap();
    (dir, Catalog::open(db))
}

fn term_search(catalog: &Catalog, mode: SearchMode, terms: &[&str], limit: usize) -> Vec<String> {
    yansi::disable();
    let mut out = Vec::new();
    commands::term_search(catalog, mode, terms, limit, &mut out).unwrap();
    String::from_utf8(out).unwrap().lines().map(String::from).collect()
}

#[test]
fn test_exact_search_full_token() {
    let (_dir, catalog) = setup();
    let lines = term_search(&catalog, SearchMode::Exact, &["1786396036.txt"], 100);

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with(&format!("[1] {} (", FILES[1])));
    assert!(lines[1].starts_with(&format!("[2] {} (", FILES[3])));
}

#[test]
fn test_exact_search_partial_token_has_no_results() {
    let (_dir, catalog) = setup();
    let lines = term_search(&catalog, SearchMode::Exact, &["1786396036"], 100);
    assert_eq!(lines, vec!["No results found for term '1786396036'"]);
}

#[test]
fn test_fuzzy_search_unknown_token() {
    let (_dir, catalog) = setup();
    let lines = term_search(&catalog, SearchMode::Fuzzy, &["abcde"], 100);
    assert_eq!(lines, vec!["No results found for term 'abcde'"]);
}

#[test]
fn test_fuzzy_search_intersects_tokens() {
    let (_dir, catalog) = setup();
    let lines = term_search(&catalog, SearchMode::Fuzzy, &["bar", "1786396036"], 100);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(FILES[1]));
}

#[test]
fn test_fuzzy_search_disjoint_tokens() {
    let (_dir, catalog) = setup();
    let lines = term_search(&catalog, SearchMode::Fuzzy, &["foo", "quix"], 100);
    assert_eq!(lines, vec!["No results found."]);
}

#[test]
fn test_search_is_case_insensitive() {
    let (_dir, catalog) = setup();
    let lines = term_search(&catalog, SearchMode::Fuzzy, &["QUIX"], 100);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(FILES[3]));
}

#[test]
fn test_search_truncates_at_limit() {
    let (_dir, catalog) = setup();
    let lines = term_search(&catalog, SearchMode::Fuzzy, &["txt"], 2);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "... (truncated)");
}

#[test]
fn test_file_search_uses_name_tokens() {
    let (_dir, catalog) = setup();
    yansi::disable();
    let mut out = Vec::new();
    commands::file_search(&catalog, "/elsewhere/new-1786396036.txt", 100, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    // "new" matches nothing, so the whole query fails on that token
    assert_eq!(text, "No results found for term 'new'\n");

    let mut out = Vec::new();
    commands::file_search(&catalog, "/elsewhere/quix-1786396036.txt", 100, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.contains(FILES[3]));
}
