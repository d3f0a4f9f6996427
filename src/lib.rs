//! # Harf
//!
//! Diacritic-insensitive Arabic text normalization, matching and highlighting.
//!
//! ## Features
//!
//! - Orthographic normalization (tashkeel, tatweel, alef/teh marbuta/alef maksura variants)
//! - Offset tracking from normalized text back to the original
//! - Tolerant patterns that match un-normalized text directly
//! - Highlighting, multi-term highlighting and snippets
//! - Name/number lookup for surah and juz lists
//!
//! ## Example
//!
//! ```
//! use harf::{highlight, normalize};
//!
//! assert_eq!(normalize("الإسلام"), normalize("الأسلام"));
//! assert_eq!(
//!     highlight("بِسْمِ اللَّهِ", "بسم", "<b>", "</b>").unwrap(),
//!     "<b>بِسْمِ</b> اللَّهِ"
//! );
//! ```

pub mod analysis;
pub mod cli;
pub mod error;
pub mod highlight;
pub mod lookup;
pub mod pattern;
pub mod query;

pub use analysis::normalize;
pub use error::{HarfError, Result};
pub use highlight::{HighlightConfig, Highlighter, highlight};
pub use pattern::{MatchSpan, TolerantPattern, build_tolerant_pattern};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
