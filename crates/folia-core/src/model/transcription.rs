//! Precomputed transcription variants for text and proximity search.

use std::collections::BTreeSet;

use crate::text::fold_script;

/// One normalization of a transcription.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextVariant {
    pub text: String,
    pub tokens: Vec<String>,
    pub words: BTreeSet<String>,
}

impl TextVariant {
    fn new(text: String) -> Self {
        let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        let words = tokens.iter().cloned().collect();
        Self {
            text,
            tokens,
            words,
        }
    }
}

/// The four variants a visual-object transcription is searched in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcription {
    pub original: TextVariant,
    pub lower: TextVariant,
    /// Script-folded, diacritics stripped, lower-cased.
    pub normalized: TextVariant,
    /// Script-folded, diacritics stripped, case preserved.
    pub normalized_cs: TextVariant,
}

impl Transcription {
    pub fn new(text: &str) -> Self {
        let folded = fold_script(text);
        Self {
            original: TextVariant::new(text.to_string()),
            lower: TextVariant::new(text.to_lowercase()),
            normalized: TextVariant::new(folded.to_lowercase()),
            normalized_cs: TextVariant::new(folded),
        }
    }

    /// Variant selected by the two sensitivity flags.
    pub fn variant(&self, case_sensitive: bool, diacritics_sensitive: bool) -> &TextVariant {
        match (diacritics_sensitive, case_sensitive) {
            (true, true) => &self.original,
            (true, false) => &self.lower,
            (false, true) => &self.normalized_cs,
            (false, false) => &self.normalized,
        }
    }
}

/// Normalize a search term the way [`Transcription::variant`] normalizes text.
pub fn normalize_query(term: &str, case_sensitive: bool, diacritics_sensitive: bool) -> String {
    let term = if diacritics_sensitive {
        term.to_string()
    } else {
        fold_script(term)
    };
    if case_sensitive {
        term
    } else {
        term.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insensitive_variant_folds_greek() {
        let t = Transcription::new("ὁ Τοξότης ἔβαλε");
        let variant = t.variant(false, false);
        assert!(variant.words.contains(&normalize_query("Toxotes", false, false)));
    }

    #[test]
    fn greek_capitals_fold_like_lowercase() {
        let t = Transcription::new("ΡΗΤΩΡ");
        let query = normalize_query("ρητωρ", false, false);
        assert_eq!(query, "retor");
        assert!(t.variant(false, false).words.contains(&query));
    }

    #[test]
    fn greek_query_matches_latin_text() {
        let t = Transcription::new("retor et toxotes");
        let variant = t.variant(false, false);
        assert!(variant.words.contains(&normalize_query("Τοξότης", false, false)));
        assert!(variant.words.contains(&normalize_query("ΡΗΤΩΡ", false, false)));
    }

    #[test]
    fn sensitive_variant_keeps_original_text() {
        let t = Transcription::new("Ave Maria");
        assert_eq!(t.variant(true, true).text, "Ave Maria");
        assert_eq!(t.variant(false, true).tokens, vec!["ave", "maria"]);
    }
}
