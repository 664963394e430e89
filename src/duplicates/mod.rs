//! Duplicate detection and interactive resolution.
//!
//! Detection runs in two passes:
//! - size and hash: same digest and same size
//! - search term: a shared long base-name token
//!
//! Each pass snapshots its candidate groups first, then prompts per group.

pub mod groups;
pub mod resolver;

pub use groups::{
    group_by_search_term, group_by_size_and_hash, CandidateGroup, GroupStrategy,
    DEFAULT_MIN_TERM_LENGTH,
};
pub use resolver::{
    parse_selection, resolve_groups, ResolutionReport, ResolveOptions, SelectionError,
    DELETE_PROMPT,
};
