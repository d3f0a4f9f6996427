//! Diacritic-insensitive highlighting of Arabic text.
//!
//! The query is normalized, expanded into a [`TolerantPattern`] and run over
//! the original text; every match is wrapped in markers while the rest of
//! the text is copied byte for byte.

use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::char_filter::arabic::{ArabicNormalizer, NormalizerConfig, normalize};
use crate::error::{HarfError, Result};
use crate::pattern::{MatchSpan, TolerantPattern, build_tolerant_pattern, extend_over_marks, wrap_spans};

/// Highlight every occurrence of `query` in `haystack`.
///
/// The query is trimmed and normalized first; matches are leftmost,
/// greedy and never overlap. With no match (or an empty query) the haystack
/// is returned unchanged.
///
/// ```
/// use harf::highlight::highlight;
///
/// let out = highlight("بِسْمِ اللَّهِ", "بسم", "<b>", "</b>").unwrap();
/// assert_eq!(out, "<b>بِسْمِ</b> اللَّهِ");
/// ```
pub fn highlight(haystack: &str, query: &str, mark_start: &str, mark_end: &str) -> Result<String> {
    let pattern = build_tolerant_pattern(&normalize(query.trim()))?;
    Ok(pattern.wrap(haystack, mark_start, mark_end))
}

/// Configuration for text highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// HTML tag to wrap highlighted terms (e.g., "mark", "em", "strong").
    pub tag: String,
    /// CSS class to add to highlight tags.
    pub css_class: Option<String>,
    /// Explicit opening marker; overrides `tag` and `css_class`.
    pub mark_start: Option<String>,
    /// Explicit closing marker; overrides `tag`.
    pub mark_end: Option<String>,
    /// Length of a snippet in grapheme clusters.
    pub snippet_length: usize,
    /// Marker for text cut off a snippet.
    pub ellipsis: String,
    /// How queries (and, with composition, haystacks) are normalized.
    pub normalizer: NormalizerConfig,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        HighlightConfig {
            tag: "mark".to_string(),
            css_class: Some("highlight".to_string()),
            mark_start: None,
            mark_end: None,
            snippet_length: 150,
            ellipsis: "...".to_string(),
            normalizer: NormalizerConfig::default(),
        }
    }
}

impl HighlightConfig {
    /// Create a new highlight configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTML tag for highlighting.
    pub fn tag(mut self, tag: String) -> Self {
        self.tag = tag;
        self
    }

    /// Set the CSS class for highlight tags.
    pub fn css_class(mut self, css_class: String) -> Self {
        self.css_class = Some(css_class);
        self
    }

    /// Emit bare tags without a class attribute.
    pub fn no_css_class(mut self) -> Self {
        self.css_class = None;
        self
    }

    /// Use explicit markers instead of HTML tags.
    pub fn markers(mut self, start: String, end: String) -> Self {
        self.mark_start = Some(start);
        self.mark_end = Some(end);
        self
    }

    /// Set the snippet length in grapheme clusters.
    pub fn snippet_length(mut self, snippet_length: usize) -> Self {
        self.snippet_length = snippet_length;
        self
    }

    /// Set the normalizer configuration.
    pub fn normalizer(mut self, normalizer: NormalizerConfig) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Build the opening marker.
    pub fn opening_tag(&self) -> String {
        if let Some(ref start) = self.mark_start {
            return start.clone();
        }
        if let Some(ref css_class) = self.css_class {
            format!("<{} class=\"{}\">", self.tag, css_class)
        } else {
            format!("<{}>", self.tag)
        }
    }

    /// Build the closing marker.
    pub fn closing_tag(&self) -> String {
        match self.mark_end {
            Some(ref end) => end.clone(),
            None => format!("</{}>", self.tag),
        }
    }
}

/// A highlighted excerpt of a longer text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// The excerpt with markers and ellipses applied.
    pub text: String,
    /// Starting byte offset of the excerpt in the original text.
    pub start_offset: usize,
    /// Ending byte offset of the excerpt in the original text.
    pub end_offset: usize,
    /// Number of matches inside the excerpt.
    pub match_count: usize,
}

/// Highlighter bound to a configuration.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    config: HighlightConfig,
    normalizer: ArabicNormalizer,
}

impl Highlighter {
    /// Create a new highlighter.
    pub fn new(config: HighlightConfig) -> Self {
        let normalizer = ArabicNormalizer::with_config(config.normalizer.clone());
        Highlighter { config, normalizer }
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Build the tolerant pattern for a raw user query.
    pub fn pattern(&self, query: &str) -> Result<TolerantPattern> {
        TolerantPattern::new(&self.normalizer.normalize(query.trim()))
    }

    /// Find every match of `query` in `text`.
    pub fn find_spans(&self, text: &str, query: &str) -> Result<Vec<MatchSpan>> {
        let pattern = self.pattern(query)?;
        Ok(self.spans_with(&pattern, text))
    }

    /// Highlight every match of `query` in `text`.
    pub fn highlight(&self, text: &str, query: &str) -> Result<String> {
        let pattern = self.pattern(query)?;
        Ok(self.wrap_with(&pattern, text))
    }

    /// Highlight `text`, falling back to the plain text if the pattern fails.
    pub fn highlight_or_plain(&self, text: &str, query: &str) -> String {
        match self.highlight(text, query) {
            Ok(highlighted) => highlighted,
            Err(e) => {
                warn!("Highlighting failed, showing plain text: {e}");
                text.to_string()
            }
        }
    }

    /// Highlight several queries at once.
    ///
    /// At any position the longest matching query wins; matches never
    /// overlap.
    pub fn highlight_terms(&self, text: &str, terms: &[&str]) -> Result<String> {
        let normalized: Vec<String> = terms
            .iter()
            .map(|term| self.normalizer.normalize(term.trim()))
            .collect();
        let refs: Vec<&str> = normalized.iter().map(String::as_str).collect();
        let pattern = TolerantPattern::any_of(&refs)?;
        Ok(self.wrap_with(&pattern, text))
    }

    /// Highlight the same query in many texts, compiling the pattern once.
    pub fn highlight_batch(&self, texts: &[&str], query: &str) -> Result<Vec<String>> {
        let pattern = self.pattern(query)?;
        debug!("Highlighting {} texts for {:?}", texts.len(), pattern.query());

        Ok(texts
            .par_iter()
            .map(|text| self.wrap_with(&pattern, text))
            .collect())
    }

    /// Cut a highlighted excerpt around the first match of `query`.
    ///
    /// The excerpt is `snippet_length` grapheme clusters long (longer only if
    /// the first match itself is longer) and starts a third of that length
    /// before the match. Without a match the head of the text is returned.
    pub fn snippet(&self, text: &str, query: &str) -> Result<Snippet> {
        let max_length = self.config.snippet_length;
        if max_length == 0 {
            return Err(HarfError::invalid_argument("snippet length must be positive"));
        }

        let spans = self.find_spans(text, query)?;

        let mut boundaries: Vec<usize> = text.grapheme_indices(true).map(|(i, _)| i).collect();
        boundaries.push(text.len());
        let grapheme_count = boundaries.len() - 1;

        let (start_g, end_g) = match spans.first() {
            Some(first) => {
                let match_g = boundaries.partition_point(|&b| b <= first.start) - 1;
                let start_g = match_g.saturating_sub(max_length / 3);
                let end_g = (start_g + max_length).min(grapheme_count);
                (end_g.saturating_sub(max_length).min(start_g), end_g)
            }
            None => (0, max_length.min(grapheme_count)),
        };

        let start = boundaries[start_g];
        let end = match spans.first() {
            Some(first) => boundaries[end_g].max(first.end),
            None => boundaries[end_g],
        };

        let inside: Vec<MatchSpan> = spans
            .iter()
            .filter(|s| s.start >= start && s.end <= end)
            .map(|s| MatchSpan::new(s.start - start, s.end - start))
            .collect();

        let mut excerpt = String::new();
        if start > 0 {
            excerpt.push_str(&self.config.ellipsis);
        }
        excerpt.push_str(&wrap_spans(
            &text[start..end],
            &inside,
            &self.config.opening_tag(),
            &self.config.closing_tag(),
        ));
        if end < text.len() {
            excerpt.push_str(&self.config.ellipsis);
        }

        Ok(Snippet {
            text: excerpt,
            start_offset: start,
            end_offset: end,
            match_count: inside.len(),
        })
    }

    fn wrap_with(&self, pattern: &TolerantPattern, text: &str) -> String {
        let spans = self.spans_with(pattern, text);
        wrap_spans(
            text,
            &spans,
            &self.config.opening_tag(),
            &self.config.closing_tag(),
        )
    }

    /// Find every match of an already built pattern in `text`.
    ///
    /// Build the pattern with [`Highlighter::pattern`] so it agrees with this
    /// highlighter's normalizer.
    pub fn spans_with(&self, pattern: &TolerantPattern, text: &str) -> Vec<MatchSpan> {
        if !self.normalizer.composes() {
            return pattern.find_spans(text);
        }

        // Decomposed input cannot be matched in place: match the normalized
        // text and carry the spans back.
        let normalized = self.normalizer.normalize_with_offsets(text);
        let mut spans: Vec<MatchSpan> = pattern
            .find_spans(normalized.as_str())
            .into_iter()
            .map(|span| MatchSpan::from(normalized.original_range(span.range())))
            .collect();

        for i in 0..spans.len() {
            let limit = spans.get(i + 1).map_or(text.len(), |next| next.start);
            spans[i].end = extend_over_marks(text, spans[i].end, limit);
        }

        spans
    }
}
