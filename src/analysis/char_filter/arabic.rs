//! Arabic orthographic normalization.
//!
//! Canonicalizes Arabic text for comparison:
//! - Remove diacritics (tashkeel, U+064B..=U+0652)
//! - Remove tatweel (kashida, U+0640)
//! - Normalize alef variants (أ إ آ ٱ) to bare alef (ا)
//! - Normalize teh marbuta (ة) to heh (ه)
//! - Normalize alef maksura (ى) to yeh (ي)
//!
//! Nothing else is touched: spacing, punctuation and non-Arabic text pass
//! through unchanged. Every replacement has the same UTF-8 width as the
//! character it replaces, so only deletions move offsets.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use super::unicode_normalize::{CompositionForm, UnicodeNormalizationCharFilter};
use super::{CharFilter, Transformation, original_end_offset, original_offset, push_transformation};

/// Bare alef (ا).
pub const ALEF: char = '\u{0627}';

/// Alef variants unified into [`ALEF`].
pub const ALEF_VARIANTS: [char; 4] = [
    '\u{0623}', // Alef with hamza above (أ)
    '\u{0625}', // Alef with hamza below (إ)
    '\u{0622}', // Alef with madda (آ)
    '\u{0671}', // Alef wasla (ٱ)
];

/// Teh marbuta (ة).
pub const TEH_MARBUTA: char = '\u{0629}';

/// Heh (ه).
pub const HEH: char = '\u{0647}';

/// Alef maksura (ى).
pub const ALEF_MAKSURA: char = '\u{0649}';

/// Yeh (ي).
pub const YEH: char = '\u{064A}';

/// Tatweel / kashida (ـ).
pub const TATWEEL: char = '\u{0640}';

/// First and last diacritical mark removed by normalization.
pub const DIACRITICS: (char, char) = ('\u{064B}', '\u{0652}');

/// Check if a character is one of the removed Arabic diacritics.
#[inline]
pub fn is_diacritic(c: char) -> bool {
    (DIACRITICS.0..=DIACRITICS.1).contains(&c)
}

/// Check if a character is dropped by normalization (diacritic or tatweel).
#[inline]
pub fn is_ignorable(c: char) -> bool {
    is_diacritic(c) || c == TATWEEL
}

/// Normalize Arabic text for comparison.
///
/// Applies every step listed in the module documentation. This is a total
/// function: any string is accepted and the empty string maps to itself.
/// Normalizing already normalized text returns it unchanged.
///
/// ```
/// use harf::analysis::normalize;
///
/// assert_eq!(normalize("بِسْمِ اللَّهِ"), "بسم الله");
/// assert_eq!(normalize("الإسلام"), normalize("الأسلام"));
/// assert_eq!(normalize("مدرسة"), "مدرسه");
/// ```
pub fn normalize(text: &str) -> String {
    text.chars().filter_map(canonical_char).collect()
}

#[inline]
fn canonical_char(c: char) -> Option<char> {
    match c {
        _ if is_ignorable(c) => None,
        _ if ALEF_VARIANTS.contains(&c) => Some(ALEF),
        TEH_MARBUTA => Some(HEH),
        ALEF_MAKSURA => Some(YEH),
        _ => Some(c),
    }
}

/// Which normalization steps an [`ArabicNormalizer`] applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Remove diacritical marks (tashkeel).
    pub remove_diacritics: bool,
    /// Remove tatweel (kashida).
    pub remove_tatweel: bool,
    /// Normalize alef variants to bare alef.
    pub normalize_alef: bool,
    /// Normalize teh marbuta to heh.
    pub normalize_teh_marbuta: bool,
    /// Normalize alef maksura to yeh.
    pub normalize_alef_maksura: bool,
    /// Compose decomposed sequences (e.g. alef + combining hamza) first.
    pub composition: Option<CompositionForm>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        NormalizerConfig {
            remove_diacritics: true,
            remove_tatweel: true,
            normalize_alef: true,
            normalize_teh_marbuta: true,
            normalize_alef_maksura: true,
            composition: None,
        }
    }
}

impl NormalizerConfig {
    /// Create a configuration with every Arabic step enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable a Unicode composition pass before the Arabic steps.
    pub fn composition(mut self, form: CompositionForm) -> Self {
        self.composition = Some(form);
        self
    }

    /// Keep diacritics in the output.
    pub fn keep_diacritics(mut self) -> Self {
        self.remove_diacritics = false;
        self
    }

    /// Keep tatweel in the output.
    pub fn keep_tatweel(mut self) -> Self {
        self.remove_tatweel = false;
        self
    }

    /// Keep alef, teh marbuta and alef maksura variants as written.
    pub fn keep_letter_variants(mut self) -> Self {
        self.normalize_alef = false;
        self.normalize_teh_marbuta = false;
        self.normalize_alef_maksura = false;
        self
    }
}

/// Normalized text together with the edits that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    transformations: Vec<Transformation>,
}

impl NormalizedText {
    /// The normalized text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length-changing edits, in ascending order.
    pub fn transformations(&self) -> &[Transformation] {
        &self.transformations
    }

    /// Map a byte range of the normalized text onto the original text.
    ///
    /// The mapped range starts at the first original character of the range
    /// and stops before any deleted marks that follow its last character.
    pub fn original_range(&self, range: Range<usize>) -> Range<usize> {
        let start = original_offset(&self.transformations, range.start);
        let end = original_end_offset(&self.transformations, range.end);
        start..end.max(start)
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Configurable Arabic normalizer usable as a [`CharFilter`].
///
/// With the default configuration its output is identical to [`normalize`].
#[derive(Debug, Clone, Default)]
pub struct ArabicNormalizer {
    config: NormalizerConfig,
    composer: Option<UnicodeNormalizationCharFilter>,
}

impl ArabicNormalizer {
    /// Create a normalizer with every Arabic step enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalizer from an explicit configuration.
    pub fn with_config(config: NormalizerConfig) -> Self {
        let composer = config.composition.map(UnicodeNormalizationCharFilter::new);
        ArabicNormalizer { config, composer }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Whether this normalizer can merge characters (composition enabled).
    pub fn composes(&self) -> bool {
        self.composer.is_some()
    }

    /// Normalize text, discarding offset information.
    pub fn normalize(&self, text: &str) -> String {
        self.filter(text).0
    }

    /// Normalize text, keeping the edits needed to map offsets back.
    pub fn normalize_with_offsets(&self, text: &str) -> NormalizedText {
        let (text, transformations) = self.filter(text);
        NormalizedText {
            text,
            transformations,
        }
    }

    fn map_char(&self, c: char) -> Option<char> {
        let config = &self.config;
        if config.remove_diacritics && is_diacritic(c) {
            return None;
        }
        if config.remove_tatweel && c == TATWEEL {
            return None;
        }
        if config.normalize_alef && ALEF_VARIANTS.contains(&c) {
            return Some(ALEF);
        }
        if config.normalize_teh_marbuta && c == TEH_MARBUTA {
            return Some(HEH);
        }
        if config.normalize_alef_maksura && c == ALEF_MAKSURA {
            return Some(YEH);
        }
        Some(c)
    }

    /// Map `source` into `output`; `original` is the input range it stands for.
    fn push_segment(
        &self,
        original: Range<usize>,
        source: &str,
        output: &mut String,
        transformations: &mut Vec<Transformation>,
    ) {
        let new_start = output.len();
        output.extend(source.chars().filter_map(|c| self.map_char(c)));
        let new_end = output.len();

        if new_end - new_start != original.len() {
            push_transformation(
                transformations,
                Transformation::new(original.start, original.end, new_start, new_end),
            );
        }
    }
}

impl CharFilter for ArabicNormalizer {
    fn filter(&self, input: &str) -> (String, Vec<Transformation>) {
        let mut output = String::with_capacity(input.len());
        let mut transformations = Vec::new();

        match &self.composer {
            Some(composer) => {
                // Composition never crosses a grapheme boundary.
                for (start, grapheme) in input.grapheme_indices(true) {
                    let composed = composer.compose(grapheme);
                    let original = start..start + grapheme.len();
                    self.push_segment(original, &composed, &mut output, &mut transformations);
                }
            }
            None => {
                for (start, c) in input.char_indices() {
                    let original = start..start + c.len_utf8();
                    let source = &input[original.clone()];
                    self.push_segment(original, source, &mut output, &mut transformations);
                }
            }
        }

        (output, transformations)
    }

    fn name(&self) -> &'static str {
        "arabic_normalize"
    }
}
