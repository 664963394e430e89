//! Human-readable rendering of catalog results.
//!
//! - [`highlight`]: marks query tokens inside a path
//! - [`listing`]: numbered record listings and search outcomes

pub mod highlight;
pub mod listing;

pub use highlight::{highlight, Highlight, PaintedHighlight, Segment};
pub use listing::{write_hits, write_listing, write_search_outcome, TRUNCATED_MARKER};
