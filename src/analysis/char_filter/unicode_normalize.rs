use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use super::{CharFilter, Transformation, push_transformation};

/// Supported Unicode composition forms.
///
/// Only composing forms are offered: decomposition would split hamza and
/// madda off their alef and defeat the Arabic letter-variant mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositionForm {
    Nfc,
    Nfkc,
}

/// A char filter that performs Unicode composition, one grapheme at a time.
#[derive(Debug, Clone, Copy)]
pub struct UnicodeNormalizationCharFilter {
    form: CompositionForm,
}

impl UnicodeNormalizationCharFilter {
    pub fn new(form: CompositionForm) -> Self {
        Self { form }
    }

    pub fn form(&self) -> CompositionForm {
        self.form
    }

    /// Compose a single grapheme cluster.
    pub fn compose(&self, grapheme: &str) -> String {
        match self.form {
            CompositionForm::Nfc => grapheme.nfc().collect(),
            CompositionForm::Nfkc => grapheme.nfkc().collect(),
        }
    }
}

impl CharFilter for UnicodeNormalizationCharFilter {
    fn filter(&self, input: &str) -> (String, Vec<Transformation>) {
        let mut output = String::with_capacity(input.len());
        let mut transformations = Vec::new();

        for (start, grapheme) in input.grapheme_indices(true) {
            let new_start = output.len();
            output.push_str(&self.compose(grapheme));
            let new_end = output.len();

            if new_end - new_start != grapheme.len() {
                push_transformation(
                    &mut transformations,
                    Transformation::new(start, start + grapheme.len(), new_start, new_end),
                );
            }
        }

        (output, transformations)
    }

    fn name(&self) -> &'static str {
        "unicode_normalization"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nfc_composes_hamza_and_madda() {
        let filter = UnicodeNormalizationCharFilter::new(CompositionForm::Nfc);

        let (output, transformations) = filter.filter("\u{0627}\u{0654}");
        assert_eq!(output, "\u{0623}");
        assert_eq!(transformations, vec![Transformation::new(0, 4, 0, 2)]);

        let (output, _) = filter.filter("\u{0627}\u{0653}");
        assert_eq!(output, "\u{0622}");

        let (output, _) = filter.filter("\u{0627}\u{0655}");
        assert_eq!(output, "\u{0625}");
    }

    #[test]
    fn test_nfc_leaves_composed_text_alone() {
        let filter = UnicodeNormalizationCharFilter::new(CompositionForm::Nfc);
        let input = "أَعُوذُ بِاللَّهِ";
        let (output, transformations) = filter.filter(input);
        assert_eq!(output, input);
        assert!(transformations.is_empty());
    }

    #[test]
    fn test_nfkc_unfolds_presentation_forms() {
        let filter = UnicodeNormalizationCharFilter::new(CompositionForm::Nfkc);
        // Arabic ligature lam with alef, isolated form
        let (output, transformations) = filter.filter("\u{FEFB}");
        assert_eq!(output, "\u{0644}\u{0627}");
        assert_eq!(transformations, vec![Transformation::new(0, 3, 0, 4)]);

        // Fullwidth "Ａ" to halfwidth "A"
        let (output, _) = filter.filter("\u{ff21}");
        assert_eq!(output, "A");
    }

    #[test]
    fn test_form_deserializes_lowercase() {
        let form: CompositionForm = serde_json::from_str("\"nfkc\"").unwrap();
        assert_eq!(form, CompositionForm::Nfkc);
    }
}
