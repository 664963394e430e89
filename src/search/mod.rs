//! Search engine over the search-term index.
//!
//! # Overview
//!
//! A query is a list of tokens. Each token resolves to a set of record paths,
//! and the final result is the intersection of those sets:
//!
//! - [`SearchMode::Exact`]: the token must be a key of the term index
//! - [`SearchMode::Fuzzy`]: union of every bucket whose key contains the token
//!
//! A token that matches nothing aborts the search with
//! [`SearchOutcome::NoMatchForToken`]. Results are ordered by path and capped
//! at a display limit.
//!
//! # Example
//!
//! ```
//! use dupecat::catalog::{Record, RecordIndex};
//! use dupecat::search::{search, SearchMode, SearchOutcome};
//!
//! let mut index = RecordIndex::new();
//! index.insert(Record::new("/m/bar-1786396036.txt", 1, "a")).unwrap();
//! index.insert(Record::new("/m/quix-1786396036.txt", 2, "b")).unwrap();
//!
//! match search(&index, SearchMode::Fuzzy, &["bar", "1786396036"], 100) {
//!     SearchOutcome::Matches(hits) => assert_eq!(hits.records.len(), 1),
//!     other => panic!("unexpected outcome: {:?}", other),
//! }
//! ```

use std::collections::BTreeSet;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::catalog::{Record, RecordIndex};
use crate::scanner::path_utils::{normalize_query, search_terms};

/// Default number of results shown.
pub const DEFAULT_DISPLAY_LIMIT: usize = 100;

/// How query tokens are matched against indexed terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Verbatim term lookup.
    #[value(alias = "fast")]
    #[serde(alias = "fast")]
    Exact,
    /// Substring containment over all terms.
    #[default]
    #[value(alias = "slow")]
    #[serde(alias = "slow")]
    Fuzzy,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Exact => write!(f, "exact"),
            SearchMode::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

/// Matching records, capped at the display limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHits {
    /// Normalized query tokens, used for highlighting.
    pub tokens: Vec<String>,
    /// Matching records ordered by path, at most `limit` of them.
    pub records: Vec<Record>,
    /// Number of matches before the cap.
    pub total: usize,
}

impl SearchHits {
    /// Whether matches were dropped by the display cap.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.total > self.records.len()
    }
}

/// Result of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// At least one record matched every token.
    Matches(SearchHits),
    /// This token matched no indexed term.
    NoMatchForToken(String),
    /// The query was empty or the intersection was empty.
    NoResults,
}

/// Resolve each token to the set of paths it matches.
///
/// Returns `Err(token)` for the first token with no match.
pub fn collect_matches<'a>(
    index: &'a RecordIndex,
    mode: SearchMode,
    tokens: &[String],
) -> Result<Vec<BTreeSet<&'a str>>, String> {
    let mut groups = Vec::with_capacity(tokens.len());

    for token in tokens {
        let found: BTreeSet<&str> = match mode {
            SearchMode::Exact => index
                .by_term()
                .get(token)
                .map(|bucket| bucket.iter().map(String::as_str).collect())
                .unwrap_or_default(),
            SearchMode::Fuzzy => index
                .by_term()
                .iter()
                .filter(|(term, _)| term.contains(token.as_str()))
                .flat_map(|(_, bucket)| bucket.iter().map(String::as_str))
                .collect(),
        };

        if found.is_empty() {
            return Err(token.clone());
        }
        groups.push(found);
    }

    Ok(groups)
}

/// Intersect path sets, stopping as soon as the running result is empty.
#[must_use]
pub fn intersect<'a>(groups: &[BTreeSet<&'a str>]) -> BTreeSet<&'a str> {
    let Some((first, rest)) = groups.split_first() else {
        return BTreeSet::new();
    };

    let mut result = first.clone();
    for group in rest {
        result.retain(|path| group.contains(path));
        if result.is_empty() {
            break;
        }
    }
    result
}

/// Run a query against the index.
#[must_use]
pub fn search<S: AsRef<str>>(
    index: &RecordIndex,
    mode: SearchMode,
    query: &[S],
    limit: usize,
) -> SearchOutcome {
    let tokens = normalize_query(query);
    if tokens.is_empty() {
        return SearchOutcome::NoResults;
    }

    let groups = match collect_matches(index, mode, &tokens) {
        Ok(groups) => groups,
        Err(token) => {
            log::debug!("No {} match for token '{}'", mode, token);
            return SearchOutcome::NoMatchForToken(token);
        }
    };

    let matched = intersect(&groups);
    if matched.is_empty() {
        return SearchOutcome::NoResults;
    }

    let total = matched.len();
    let records = matched
        .into_iter()
        .take(limit)
        .filter_map(|path| index.get(path).cloned())
        .collect();

    SearchOutcome::Matches(SearchHits {
        tokens,
        records,
        total,
    })
}

/// Search for records related to a file by the terms of its own name.
#[must_use]
pub fn search_by_file(index: &RecordIndex, path: &str, limit: usize) -> SearchOutcome {
    let terms = search_terms(path);
    search(index, SearchMode::Fuzzy, terms.as_slice(), limit)
}
