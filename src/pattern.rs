//! Tolerant patterns for diacritic-insensitive Arabic matching.
//!
//! A [`TolerantPattern`] is built from a normalized query and runs directly
//! against un-normalized text, so every [`MatchSpan`] it reports points into
//! the text the caller actually displays.
//!
//! Each query character expands to a matcher:
//! - bare alef matches any of أ إ آ ٱ ا
//! - heh matches ه or ة
//! - yeh matches ي or ى
//! - anything else matches itself (escaped, so `.` or `(` are literal)
//!
//! Between two matchers any run of diacritics or tatweel is allowed. Marks
//! that directly follow the last matched letter belong to it and are
//! included in the span.
//!
//! # Examples
//!
//! ```
//! use harf::analysis::normalize;
//! use harf::pattern::build_tolerant_pattern;
//!
//! let pattern = build_tolerant_pattern(&normalize("بسم")).unwrap();
//! let text = "بِسْمِ اللَّهِ";
//! let spans = pattern.find_spans(text);
//! assert_eq!(spans.len(), 1);
//! assert_eq!(spans[0].text(text), "بِسْمِ");
//! ```

use std::fmt;
use std::ops::Range;

use log::debug;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::analysis::char_filter::arabic::{
    ALEF, ALEF_MAKSURA, ALEF_VARIANTS, DIACRITICS, HEH, TEH_MARBUTA, TATWEEL, YEH, is_diacritic,
};
use crate::error::{HarfError, Result};

/// Upper bound on the compiled size of a single tolerant pattern.
///
/// Search queries are short; anything larger is rejected as a pattern error.
pub const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// A matched byte range in the original, un-normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchSpan {
    /// Byte offset of the first matched character.
    pub start: usize,
    /// Byte offset just past the match.
    pub end: usize,
}

impl MatchSpan {
    pub fn new(start: usize, end: usize) -> Self {
        MatchSpan { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The matched slice of `haystack`.
    pub fn text<'a>(&self, haystack: &'a str) -> &'a str {
        &haystack[self.range()]
    }
}

impl From<MatchSpan> for Range<usize> {
    fn from(span: MatchSpan) -> Self {
        span.range()
    }
}

impl From<Range<usize>> for MatchSpan {
    fn from(range: Range<usize>) -> Self {
        MatchSpan::new(range.start, range.end)
    }
}

impl fmt::Display for MatchSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Build a tolerant pattern from a normalized query.
///
/// See [`TolerantPattern::new`].
pub fn build_tolerant_pattern(normalized_query: &str) -> Result<TolerantPattern> {
    TolerantPattern::new(normalized_query)
}

/// A compiled diacritic- and letter-variant-insensitive matcher.
///
/// An empty query produces a pattern that matches nothing.
#[derive(Debug, Clone)]
pub struct TolerantPattern {
    query: String,
    regex: Option<Regex>,
}

impl TolerantPattern {
    /// Compile the tolerant pattern for `normalized_query`.
    ///
    /// The query should already be normalized; an un-normalized query is
    /// accepted but its variant letters and marks only match literally.
    ///
    /// # Errors
    ///
    /// Returns [`HarfError::Pattern`] if the regex engine rejects the
    /// expanded pattern (for example when it exceeds the size limit).
    pub fn new(normalized_query: &str) -> Result<Self> {
        if normalized_query.is_empty() {
            return Ok(Self::empty());
        }

        let source = expand_query(normalized_query);
        let regex = compile(&source, normalized_query)?;

        Ok(TolerantPattern {
            query: normalized_query.to_string(),
            regex: Some(regex),
        })
    }

    /// Compile one pattern matching any of `normalized_queries`.
    ///
    /// Longer queries are tried first, so at a given position the longest
    /// alternative wins; across positions the leftmost match wins.
    pub fn any_of(normalized_queries: &[&str]) -> Result<Self> {
        let mut queries: Vec<&str> = normalized_queries
            .iter()
            .copied()
            .filter(|q| !q.is_empty())
            .collect();
        if queries.is_empty() {
            return Ok(Self::empty());
        }

        queries.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        queries.dedup();

        let source = queries
            .iter()
            .map(|q| format!("(?:{})", expand_query(q)))
            .collect::<Vec<_>>()
            .join("|");
        let query = queries.join("|");
        let regex = compile(&source, &query)?;

        Ok(TolerantPattern {
            query,
            regex: Some(regex),
        })
    }

    fn empty() -> Self {
        TolerantPattern {
            query: String::new(),
            regex: None,
        }
    }

    /// The normalized query this pattern was built from.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The expanded regular expression, if any.
    pub fn as_regex_str(&self) -> Option<&str> {
        self.regex.as_ref().map(|r| r.as_str())
    }

    /// Whether this pattern can never match.
    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }

    /// Test whether the pattern matches anywhere in `haystack`.
    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(haystack))
    }

    /// All non-overlapping matches, leftmost first.
    pub fn find_spans(&self, haystack: &str) -> Vec<MatchSpan> {
        let Some(regex) = &self.regex else {
            return Vec::new();
        };

        let mut spans: Vec<MatchSpan> = regex
            .find_iter(haystack)
            .map(|m| MatchSpan::new(m.start(), m.end()))
            .collect();

        for i in 0..spans.len() {
            let limit = spans.get(i + 1).map_or(haystack.len(), |next| next.start);
            spans[i].end = extend_over_marks(haystack, spans[i].end, limit);
        }

        spans
    }

    /// Copy `haystack`, wrapping every match between the two markers.
    pub fn wrap(&self, haystack: &str, mark_start: &str, mark_end: &str) -> String {
        wrap_spans(haystack, &self.find_spans(haystack), mark_start, mark_end)
    }
}

/// Copy `haystack`, wrapping each of the sorted, disjoint `spans`.
pub fn wrap_spans(haystack: &str, spans: &[MatchSpan], mark_start: &str, mark_end: &str) -> String {
    if spans.is_empty() {
        return haystack.to_string();
    }

    let extra = spans.len() * (mark_start.len() + mark_end.len());
    let mut result = String::with_capacity(haystack.len() + extra);
    let mut last_pos = 0;

    for span in spans {
        result.push_str(&haystack[last_pos..span.start]);
        result.push_str(mark_start);
        result.push_str(span.text(haystack));
        result.push_str(mark_end);
        last_pos = span.end;
    }

    result.push_str(&haystack[last_pos..]);
    result
}

/// Move `end` past diacritics attached to the preceding letter, up to `limit`.
pub(crate) fn extend_over_marks(haystack: &str, end: usize, limit: usize) -> usize {
    let mut end = end;
    for c in haystack[end..limit].chars() {
        if !is_diacritic(c) {
            break;
        }
        end += c.len_utf8();
    }
    end
}

/// Expand a normalized query into its regex source.
fn expand_query(normalized_query: &str) -> String {
    let ignorable = format!(
        "[\\x{{{:04X}}}-\\x{{{:04X}}}\\x{{{:04X}}}]*",
        DIACRITICS.0 as u32, DIACRITICS.1 as u32, TATWEEL as u32
    );

    normalized_query
        .chars()
        .map(char_matcher)
        .collect::<Vec<_>>()
        .join(&ignorable)
}

fn char_matcher(c: char) -> String {
    match c {
        ALEF => {
            let mut class = String::from("[");
            for variant in ALEF_VARIANTS.iter().chain(std::iter::once(&ALEF)) {
                class.push(*variant);
            }
            class.push(']');
            class
        }
        HEH => format!("[{HEH}{TEH_MARBUTA}]"),
        YEH => format!("[{YEH}{ALEF_MAKSURA}]"),
        _ => {
            let mut buf = [0u8; 4];
            regex::escape(c.encode_utf8(&mut buf))
        }
    }
}

fn compile(source: &str, query: &str) -> Result<Regex> {
    debug!("Compiling tolerant pattern for {query:?}: {source}");

    RegexBuilder::new(source)
        .case_insensitive(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| HarfError::pattern(format!("Invalid tolerant pattern for {query:?}: {e}")))
}
