//! Validation of raw search input.

use crate::analysis::normalize;
use crate::error::{HarfError, Result};
use crate::pattern::TolerantPattern;

/// Minimum number of characters a trimmed search query must have.
pub const MIN_QUERY_CHARS: usize = 2;

/// Trim `raw` and check it is long enough to search for.
///
/// Use this when the pattern is built elsewhere, e.g. with a configured
/// normalizer.
pub fn validate_query(raw: &str) -> Result<&str> {
    let trimmed = raw.trim();
    let chars = trimmed.chars().count();
    if chars < MIN_QUERY_CHARS {
        return Err(HarfError::query(format!(
            "Query must contain at least {MIN_QUERY_CHARS} characters, got {chars}"
        )));
    }
    Ok(trimmed)
}

/// A validated search query with its normalized form and pattern.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    raw: String,
    normalized: String,
    pattern: TolerantPattern,
}

impl SearchQuery {
    /// Trim and validate `raw`, then build its tolerant pattern.
    ///
    /// # Errors
    ///
    /// [`HarfError::Query`] if fewer than [`MIN_QUERY_CHARS`] characters remain
    /// after trimming; [`HarfError::Pattern`] if the pattern cannot be built.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = validate_query(raw)?;
        let normalized = normalize(trimmed);
        let pattern = TolerantPattern::new(&normalized)?;

        Ok(SearchQuery {
            raw: trimmed.to_string(),
            normalized,
            pattern,
        })
    }

    /// The trimmed query as typed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn pattern(&self) -> &TolerantPattern {
        &self.pattern
    }

    /// Whether `text` contains this query, ignoring diacritics and variants.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_normalizes() {
        let query = SearchQuery::parse("  الرَّحْمَٰنِ ").unwrap();
        assert_eq!(query.raw(), "الرَّحْمَٰنِ");
        assert_eq!(query.normalized(), "الرحمٰن");
        assert_eq!(query.pattern().query(), "الرحمٰن");
    }

    #[test]
    fn test_parse_rejects_short_queries() {
        for raw in ["", " ", "ا", "  ب  "] {
            let err = SearchQuery::parse(raw).unwrap_err();
            assert!(matches!(err, HarfError::Query(_)), "input: {raw:?}");
        }
        assert!(SearchQuery::parse("اب").is_ok());
    }

    #[test]
    fn test_short_query_counts_characters_not_bytes() {
        // One Arabic letter is two bytes but one character.
        assert!(SearchQuery::parse("م").is_err());
        // Letter plus a diacritic is two characters, as typed.
        assert!(SearchQuery::parse("مَ").is_ok());
    }

    #[test]
    fn test_validate_query() {
        assert_eq!(validate_query("  بسم ").unwrap(), "بسم");
        let err = validate_query(" ا ").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Query error: Query must contain at least 2 characters, got 1"
        );
    }

    #[test]
    fn test_matches() {
        let query = SearchQuery::parse("الصلاة").unwrap();
        assert!(query.matches("أَقِيمُوا الصَّلَاةَ"));
        assert!(query.matches("الصلاه"));
        assert!(!query.matches("الزكاة"));
    }
}
