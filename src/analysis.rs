//! Text analysis for harf.
//!
//! Char filters rewrite a raw string into its canonical matching form and
//! report every edit as a [`char_filter::Transformation`], so positions found
//! in the filtered text can be mapped back onto the original.

pub mod char_filter;

pub use char_filter::arabic::{ArabicNormalizer, NormalizedText, NormalizerConfig, normalize};
pub use char_filter::unicode_normalize::{CompositionForm, UnicodeNormalizationCharFilter};
pub use char_filter::{CharFilter, Transformation};
