//! ISO 639 language codes
//!
//! Expression and visual-object languages arrive as bare codes (`grc`,
//! `Lat`, ` ita `). They are displayed by English name.

pub const LANGUAGES: &[(&str, &str)] = &[
    ("grc", "Ancient Greek"),
    ("ell", "Modern Greek"),
    ("gre", "Modern Greek"),
    ("el", "Modern Greek"),
    ("lat", "Latin"),
    ("la", "Latin"),
    ("ita", "Italian"),
    ("it", "Italian"),
    ("eng", "English"),
    ("en", "English"),
    ("ang", "Old English"),
    ("enm", "Middle English"),
    ("fra", "French"),
    ("fre", "French"),
    ("fr", "French"),
    ("fro", "Old French"),
    ("frm", "Middle French"),
    ("pro", "Old Provençal"),
    ("deu", "German"),
    ("ger", "German"),
    ("de", "German"),
    ("gmh", "Middle High German"),
    ("goh", "Old High German"),
    ("spa", "Spanish"),
    ("es", "Spanish"),
    ("por", "Portuguese"),
    ("pt", "Portuguese"),
    ("cat", "Catalan"),
    ("nld", "Dutch"),
    ("dut", "Dutch"),
    ("pol", "Polish"),
    ("ces", "Czech"),
    ("cze", "Czech"),
    ("hun", "Hungarian"),
    ("rus", "Russian"),
    ("ukr", "Ukrainian"),
    ("chu", "Church Slavic"),
    ("srp", "Serbian"),
    ("hrv", "Croatian"),
    ("bul", "Bulgarian"),
    ("ron", "Romanian"),
    ("rum", "Romanian"),
    ("swe", "Swedish"),
    ("dan", "Danish"),
    ("nor", "Norwegian"),
    ("isl", "Icelandic"),
    ("fin", "Finnish"),
    ("got", "Gothic"),
    ("heb", "Hebrew"),
    ("arc", "Aramaic"),
    ("syr", "Syriac"),
    ("ara", "Arabic"),
    ("cop", "Coptic"),
    ("egy", "Egyptian"),
    ("hye", "Armenian"),
    ("arm", "Armenian"),
    ("kat", "Georgian"),
    ("geo", "Georgian"),
    ("tur", "Turkish"),
    ("ota", "Ottoman Turkish"),
    ("per", "Persian"),
    ("fas", "Persian"),
    ("san", "Sanskrit"),
    ("lad", "Ladino"),
    ("yid", "Yiddish"),
    ("zho", "Chinese"),
    ("chi", "Chinese"),
    ("jpn", "Japanese"),
    ("mul", "Multiple languages"),
    ("und", "Undetermined"),
];

/// Display name for a language code.
///
/// Lookup ignores case and surrounding whitespace; unknown codes come back
/// unchanged and an empty code is `Unknown`.
pub fn normalize_language(code: &str) -> String {
    if code.is_empty() {
        return "Unknown".to_string();
    }
    let clean = code.trim().to_lowercase();
    LANGUAGES
        .iter()
        .find(|(iso, _)| *iso == clean)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_resolve_regardless_of_case() {
        assert_eq!(normalize_language("Grc"), "Ancient Greek");
        assert_eq!(normalize_language(" lat "), "Latin");
    }

    #[test]
    fn unknown_codes_pass_through() {
        assert_eq!(normalize_language("Klingon"), "Klingon");
        assert_eq!(normalize_language(""), "Unknown");
    }
}
