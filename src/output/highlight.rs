//! Highlighting of matched query tokens inside a path.
//!
//! # Rendering policy
//!
//! For each distinct token the first case-insensitive occurrence in the path
//! is located. Then exactly one of three renderings applies:
//!
//! - [`Highlight::Spans`]: matched spans are disjoint, each is wrapped as
//!   strong and the rest of the path is kept plain
//! - [`Highlight::Ambiguous`]: two matched spans overlap, so the whole path is
//!   wrapped with the ambiguous marker instead
//! - [`Highlight::NoMatch`]: no token occurs, so the whole path is wrapped
//!   with the weak marker
//!
//! Review tooling downstream depends on this three-way split.
//!
//! The renderer returns a structured value; painting happens in its
//! [`Display`](std::fmt::Display) impl via yansi, so `yansi::disable()` yields
//! plain text. [`Highlight::paint_when`] paints regardless of that switch.
//!
//! # Example
//!
//! ```
//! use dupecat::output::highlight::{highlight, Highlight, Segment};
//!
//! let rendered = highlight("hello world", &["world"]);
//! assert_eq!(
//!     rendered,
//!     Highlight::Spans(vec![Segment::Plain("hello "), Segment::Strong("world")])
//! );
//!
//! assert!(matches!(highlight("Foobar", &["foo", "oba"]), Highlight::Ambiguous(_)));
//! assert!(matches!(highlight("Foobar", &["zzz"]), Highlight::NoMatch(_)));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;

use regex::RegexBuilder;
use yansi::{Condition, Paint, Style};

/// A piece of a precisely highlighted path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Unmatched text.
    Plain(&'a str),
    /// Text matched by a query token.
    Strong(&'a str),
}

/// A rendered path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Highlight<'a> {
    /// Disjoint matches, in path order.
    Spans(Vec<Segment<'a>>),
    /// Overlapping matches; the whole path is marked.
    Ambiguous(&'a str),
    /// Nothing matched; the whole path is marked weakly.
    NoMatch(&'a str),
}

/// Byte range of the first case-insensitive occurrence of `token`.
fn locate(haystack: &str, token: &str) -> Option<Range<usize>> {
    let regex = RegexBuilder::new(&regex::escape(token))
        .case_insensitive(true)
        .build()
        .map_err(|e| log::debug!("Cannot highlight token '{}': {}", token, e))
        .ok()?;
    regex.find(haystack).map(|m| m.range())
}

/// Highlight the tokens found in `haystack`.
#[must_use]
pub fn highlight<'a, S: AsRef<str>>(haystack: &'a str, tokens: &[S]) -> Highlight<'a> {
    let distinct: BTreeSet<String> = tokens
        .iter()
        .map(|t| t.as_ref().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    let mut spans: Vec<Range<usize>> = distinct
        .iter()
        .filter_map(|token| locate(haystack, token))
        .collect();

    if spans.is_empty() {
        return Highlight::NoMatch(haystack);
    }

    spans.sort_by_key(|span| span.start);

    let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;
    for span in spans {
        if span.start < cursor {
            return Highlight::Ambiguous(haystack);
        }
        if span.start > cursor {
            segments.push(Segment::Plain(&haystack[cursor..span.start]));
        }
        segments.push(Segment::Strong(&haystack[span.start..span.end]));
        cursor = span.end;
    }
    if cursor < haystack.len() {
        segments.push(Segment::Plain(&haystack[cursor..]));
    }

    Highlight::Spans(segments)
}

const STRONG: Style = Style::new().red().bold();
const AMBIGUOUS: Style = Style::new().bold().on_yellow();
const WEAK: Style = Style::new().yellow().bold();

impl<'a> Highlight<'a> {
    /// Paint under `condition`, ignoring the global yansi switch.
    #[must_use]
    pub fn paint_when(&self, condition: Condition) -> PaintedHighlight<'_, 'a> {
        PaintedHighlight {
            highlight: self,
            condition: Some(condition),
        }
    }
}

/// A [`Highlight`] bound to a paint condition.
pub struct PaintedHighlight<'h, 'a> {
    highlight: &'h Highlight<'a>,
    condition: Option<Condition>,
}

impl PaintedHighlight<'_, '_> {
    fn style(&self, base: Style) -> Style {
        match self.condition {
            Some(condition) => base.whenever(condition),
            None => base,
        }
    }
}

impl fmt::Display for PaintedHighlight<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.highlight {
            Highlight::Spans(segments) => {
                for segment in segments {
                    match segment {
                        Segment::Plain(text) => f.write_str(text)?,
                        Segment::Strong(text) => write!(f, "{}", text.paint(self.style(STRONG)))?,
                    }
                }
                Ok(())
            }
            Highlight::Ambiguous(text) => write!(f, "{}", text.paint(self.style(AMBIGUOUS))),
            Highlight::NoMatch(text) => write!(f, "{}", text.paint(self.style(WEAK))),
        }
    }
}

impl fmt::Display for Highlight<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let painted = PaintedHighlight {
            highlight: self,
            condition: None,
        };
        fmt::Display::fmt(&painted, f)
    }
}
