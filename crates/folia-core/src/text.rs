//! Text normalization
//!
//! Script folding for cross-script transcription search and the title-casing
//! used by filter vocabularies and detail labels.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Decompose (NFKD) and drop combining marks.
pub fn strip_diacritics(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Fold Greek, Cyrillic and a few extended Latin letters onto a Latin base.
///
/// Diacritics are stripped first so precomposed letters such as `ό` reach the
/// table as their bare base. Case is preserved; callers lower-case when they
/// need a case-insensitive variant.
pub fn fold_script(text: &str) -> String {
    let stripped = strip_diacritics(text);
    let mut out = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        match confusable(c) {
            Some(mapped) => out.push_str(mapped),
            None => out.push(c),
        }
    }
    out
}

fn confusable(c: char) -> Option<&'static str> {
    let mapped = match c {
        // Greek
        'α' => "a",
        'Α' => "A",
        'β' => "b",
        'Β' => "B",
        'γ' => "g",
        'Γ' => "G",
        'δ' => "d",
        'Δ' => "D",
        'ε' => "e",
        'Ε' => "E",
        'ζ' => "z",
        'Ζ' => "Z",
        'η' => "e",
        'Η' => "E",
        'θ' => "th",
        'Θ' => "Th",
        'ι' => "i",
        'Ι' => "I",
        'κ' => "k",
        'Κ' => "K",
        'λ' => "l",
        'Λ' => "L",
        'μ' => "m",
        'Μ' => "M",
        'ν' => "n",
        'Ν' => "N",
        'ξ' => "x",
        'Ξ' => "X",
        'ο' => "o",
        'Ο' => "O",
        'π' => "p",
        'Π' => "P",
        'ρ' => "r",
        'Ρ' => "R",
        'σ' | 'ς' => "s",
        'Σ' => "S",
        'τ' => "t",
        'Τ' => "T",
        'υ' => "y",
        'Υ' => "Y",
        'φ' => "ph",
        'Φ' => "Ph",
        'χ' => "ch",
        'Χ' => "Ch",
        'ψ' => "ps",
        'Ψ' => "Ps",
        'ω' => "o",
        'Ω' => "O",
        // Cyrillic
        'а' => "a",
        'А' => "A",
        'б' => "b",
        'Б' => "B",
        'в' => "v",
        'В' => "V",
        'г' => "g",
        'Г' => "G",
        'д' => "d",
        'Д' => "D",
        'е' | 'ё' | 'э' => "e",
        'Е' | 'Ё' | 'Э' => "E",
        'ж' => "zh",
        'Ж' => "Zh",
        'з' => "z",
        'З' => "Z",
        'и' => "i",
        'И' => "I",
        'й' | 'ы' => "y",
        'Й' | 'Ы' => "Y",
        'к' => "k",
        'К' => "K",
        'л' => "l",
        'Л' => "L",
        'м' => "m",
        'М' => "M",
        'н' => "n",
        'Н' => "N",
        'о' => "o",
        'О' => "O",
        'п' => "p",
        'П' => "P",
        'р' => "r",
        'Р' => "R",
        'с' => "s",
        'С' => "S",
        'т' => "t",
        'Т' => "T",
        'у' => "u",
        'У' => "U",
        'ф' => "f",
        'Ф' => "F",
        'х' => "kh",
        'Х' => "Kh",
        'ц' => "ts",
        'Ц' => "Ts",
        'ч' => "ch",
        'Ч' => "Ch",
        'ш' => "sh",
        'Ш' => "Sh",
        'щ' => "shch",
        'Щ' => "Shch",
        'ъ' | 'Ъ' | 'ь' | 'Ь' => "",
        'ю' => "yu",
        'Ю' => "Yu",
        'я' => "ya",
        'Я' => "Ya",
        // Extended Latin
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        'ß' => "ss",
        'ð' => "d",
        'Ð' => "D",
        'þ' => "th",
        'Þ' => "Th",
        'ł' => "l",
        'Ł' => "L",
        _ => return None,
    };
    Some(mapped)
}

/// Title-case every word: a cased letter is upper-cased when the previous
/// character is not a cased letter, lower-cased otherwise.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_cased = false;
    for c in text.chars() {
        let cased = c.is_lowercase() || c.is_uppercase();
        if cased {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
        } else {
            out.push(c);
        }
        prev_cased = cased;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn greek_folds_to_latin() {
        assert_eq!(fold_script("Τοξότης").to_lowercase(), "toxotes");
    }

    #[test]
    fn cyrillic_folds_to_latin() {
        assert_eq!(fold_script("Москва"), "Moskva");
    }

    #[test]
    fn diacritics_are_stripped() {
        assert_eq!(strip_diacritics("àèìòù ç"), "aeiou c");
    }

    #[test_case("hello world", "Hello World")]
    #[test_case("VENEZIA", "Venezia")]
    #[test_case("l'amante", "L'Amante")]
    #[test_case("1st century", "1St Century")]
    #[test_case("non-fiction", "Non-Fiction")]
    fn title_case_matches_word_boundaries(input: &str, expected: &str) {
        assert_eq!(title_case(input), expected);
    }

    proptest! {
        #[test]
        fn folding_is_idempotent(s in "\\PC{0,24}") {
            let once = fold_script(&s);
            prop_assert_eq!(fold_script(&once), once);
        }

        #[test]
        fn ascii_survives_folding(s in "[a-zA-Z0-9 .,;]{0,32}") {
            prop_assert_eq!(fold_script(&s), s);
        }
    }
}
