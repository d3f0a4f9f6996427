//! Char filter implementations for text normalization.
//!
//! A char filter rewrites the whole input string before any matching takes
//! place and reports what it changed, so that offsets found in the filtered
//! text can be carried back to the caller's original text.
//!
//! # Available Filters
//!
//! - [`arabic::ArabicNormalizer`] - Arabic diacritic removal and letter-variant unification
//! - [`unicode_normalize::UnicodeNormalizationCharFilter`] - Unicode composition (NFC, NFKC)
//!
//! # Examples
//!
//! ```
//! use harf::analysis::char_filter::{CharFilter, original_end_offset, original_offset};
//! use harf::analysis::ArabicNormalizer;
//!
//! let normalizer = ArabicNormalizer::new();
//! let (output, transformations) = normalizer.filter("بِسْمِ");
//! assert_eq!(output, "بسم");
//! // The "م" at byte 4 of the output starts at byte 8 of the input.
//! assert_eq!(original_offset(&transformations, 4), 8);
//! // The output ends before the trailing kasra at byte 10.
//! assert_eq!(original_end_offset(&transformations, 6), 10);
//! ```

/// Represents a change in the text, mapping a range in the original text
/// to a range in the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transformation {
    pub original_start: usize,
    pub original_end: usize,
    pub new_start: usize,
    pub new_end: usize,
}

impl Transformation {
    pub fn new(
        original_start: usize,
        original_end: usize,
        new_start: usize,
        new_end: usize,
    ) -> Self {
        Self {
            original_start,
            original_end,
            new_start,
            new_end,
        }
    }

    /// Whether this transformation removed text without replacing it.
    pub fn is_deletion(&self) -> bool {
        self.new_start == self.new_end
    }
}

/// Trait for character filters that transform text before matching.
///
/// Implementations return the modified text along with the transformations
/// that changed its length. Same-width substitutions are not recorded: they
/// leave every offset where it was.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text.
    ///
    /// # Returns
    ///
    /// A tuple containing:
    /// - The filtered text.
    /// - A vector of `Transformation`s in ascending order, none overlapping.
    fn filter(&self, input: &str) -> (String, Vec<Transformation>);

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

/// Record an edit, merging touching deletions into a single run.
pub(crate) fn push_transformation(transformations: &mut Vec<Transformation>, next: Transformation) {
    if let Some(last) = transformations.last_mut() {
        let touching = last.original_end == next.original_start && last.new_end == next.new_start;
        if touching && last.is_deletion() && next.is_deletion() {
            last.original_end = next.original_end;
            last.new_end = next.new_end;
            return;
        }
    }
    transformations.push(next);
}

/// Map the byte offset of a character in filtered text back to the original.
///
/// A deleted run sitting exactly at `new_offset` is skipped, so the result is
/// where the character at `new_offset` came from. Use this for span starts.
/// An offset inside a shortened (but not deleted) region maps to the start of
/// the original region.
pub fn original_offset(transformations: &[Transformation], new_offset: usize) -> usize {
    let mut shift: isize = 0;

    for t in transformations {
        if new_offset < t.new_start || (new_offset == t.new_start && !t.is_deletion()) {
            break;
        }
        if new_offset < t.new_end {
            return t.original_start;
        }
        shift = t.original_end as isize - t.new_end as isize;
    }

    (new_offset as isize + shift) as usize
}

/// Map an exclusive end offset in filtered text back to the original.
///
/// Unlike [`original_offset`], a deleted run sitting exactly at `new_offset`
/// is left outside the mapped range, and an offset inside a shortened region
/// maps to the end of the original region.
pub fn original_end_offset(transformations: &[Transformation], new_offset: usize) -> usize {
    let mut shift: isize = 0;

    for t in transformations {
        if new_offset <= t.new_start {
            break;
        }
        if new_offset < t.new_end {
            return t.original_end;
        }
        shift = t.original_end as isize - t.new_end as isize;
    }

    (new_offset as isize + shift) as usize
}

pub mod arabic;
pub mod unicode_normalize;
