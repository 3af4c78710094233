//! Date grammar
//!
//! Dates are free text in the source data: `1850`, `1850 - 1870`,
//! `XV century`, `15th century`, `MDCC`. Both the materializers (entity
//! spans) and the query engine (search bounds) parse them here.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static CENTURY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)(?:st|nd|rd|th)?(?:\s*century)?$").expect("static pattern")
});

static RANGE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*-\s*|–").expect("static pattern"));

static FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d+)\b").expect("static pattern"));

// Dotted forms end in a non-word character, so only the bare form needs a
// closing word boundary.
static BC_NOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(bc\b|b\.c\.|a\.c\.)").expect("static pattern"));

/// Inclusive year interval. Either bound may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSpan {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl YearSpan {
    pub fn new(start: Option<i64>, end: Option<i64>) -> Self {
        Self { start, end }
    }

    pub fn exact(year: i64) -> Self {
        Self::new(Some(year), Some(year))
    }

    /// End of the span, falling back to its start.
    pub fn end_or_start(&self) -> Option<i64> {
        self.end.or(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Calendar era of a year bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Era {
    #[serde(rename = "BC")]
    Bc,
    #[default]
    #[serde(rename = "AD")]
    Ad,
}

impl Era {
    pub fn as_str(&self) -> &'static str {
        match self {
            Era::Bc => "BC",
            Era::Ad => "AD",
        }
    }

    /// Apply the era to a positive year. `None` when a BC year has no negation.
    pub fn apply(&self, year: i64) -> Option<i64> {
        match self {
            Era::Bc => year.checked_neg(),
            Era::Ad => Some(year),
        }
    }
}

/// Value of a Roman numeral, `None` for anything else.
pub fn roman_to_int(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }
    let digits: Option<Vec<i64>> = s
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'I' => Some(1),
            'V' => Some(5),
            'X' => Some(10),
            'L' => Some(50),
            'C' => Some(100),
            'D' => Some(500),
            'M' => Some(1000),
            _ => None,
        })
        .collect();
    let digits = digits?;
    let mut total = 0;
    for (i, value) in digits.iter().enumerate() {
        if i > 0 && *value > digits[i - 1] {
            total += value - 2 * digits[i - 1];
        } else {
            total += value;
        }
    }
    Some(total)
}

fn century_span(century: i64) -> YearSpan {
    YearSpan::new(Some((century - 1) * 100 + 1), Some(century * 100))
}

/// Century number written as `15`, `15th`, `XV` or `XV century`, if in 1..40.
fn century_number(token: &str) -> Option<i64> {
    let captures = CENTURY.captures(token)?;
    let value = captures.get(1)?.as_str().trim();
    let number = value.parse::<i64>().ok().or_else(|| roman_to_int(value))?;
    (number > 0 && number < 40).then_some(number)
}

/// Parse one side of a date: a year, a century or a Roman numeral.
pub fn parse_date_token(token: &str) -> YearSpan {
    let token = token.trim().to_lowercase();
    if token.is_empty() {
        return YearSpan::default();
    }
    if token.chars().all(|c| c.is_ascii_digit()) {
        return token
            .parse::<i64>()
            .map(YearSpan::exact)
            .unwrap_or_default();
    }
    if let Some(century) = century_number(&token) {
        return century_span(century);
    }
    match roman_to_int(&token) {
        Some(value) if value < 40 => century_span(value),
        Some(value) => YearSpan::exact(value),
        None => YearSpan::default(),
    }
}

/// Parse a date or a `start - end` range into a year span.
pub fn parse_date_to_range(date: &str) -> YearSpan {
    if date.is_empty() {
        return YearSpan::default();
    }
    let mut parts = RANGE_SEPARATOR.splitn(date, 2);
    match (parts.next(), parts.next()) {
        (Some(start), Some(end)) => {
            let start = parse_date_token(start).start;
            let end = parse_date_token(end).end;
            YearSpan::new(start, end.or(start))
        }
        _ => parse_date_token(date),
    }
}

/// Parse a search bound. Centuries resolve to their first year when the
/// bound opens a range and to their last year when it closes one; a bare
/// Roman numeral outside the century range is an exact year.
pub fn parse_year_bound(value: &str, is_start: bool) -> Option<i64> {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        return None;
    }
    if let Ok(year) = value.parse::<i64>() {
        return Some(year);
    }
    if let Some(century) = century_number(&value) {
        let span = century_span(century);
        return if is_start { span.start } else { span.end };
    }
    roman_to_int(&value)
}

/// First integer in a person's date, negated when the notes say BC.
pub fn person_year(date: Option<&str>, notes: &str) -> (Option<i64>, Era) {
    let era = if BC_NOTE.is_match(notes) {
        Era::Bc
    } else {
        Era::Ad
    };
    let year = date
        .and_then(|d| FIRST_NUMBER.captures(d))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .and_then(|y| era.apply(y));
    (year, era)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("1850", Some(1850), Some(1850))]
    #[test_case("1850-1870", Some(1850), Some(1870))]
    #[test_case("1850 - 1870", Some(1850), Some(1870))]
    #[test_case("1850–1870", Some(1850), Some(1870); "en dash")]
    #[test_case("XV century", Some(1401), Some(1500))]
    #[test_case("15th century", Some(1401), Some(1500))]
    #[test_case("xv", Some(1401), Some(1500))]
    #[test_case("MDCC", Some(1700), Some(1700))]
    #[test_case("XV - XVI", Some(1401), Some(1600))]
    #[test_case("1850 - ?", Some(1850), Some(1850))]
    #[test_case("circa 1500", None, None)]
    #[test_case("", None, None)]
    fn entity_dates_parse_to_spans(raw: &str, start: Option<i64>, end: Option<i64>) {
        assert_eq!(parse_date_to_range(raw), YearSpan::new(start, end));
    }

    #[test_case("1500", true, Some(1500))]
    #[test_case("-50", true, Some(-50))]
    #[test_case("XV", true, Some(1401))]
    #[test_case("XV", false, Some(1500))]
    #[test_case("15th century", false, Some(1500))]
    #[test_case("MDCC", true, Some(1700))]
    #[test_case("later", true, None)]
    fn search_bounds_parse(raw: &str, is_start: bool, expected: Option<i64>) {
        assert_eq!(parse_year_bound(raw, is_start), expected);
    }

    #[test]
    fn roman_numerals_use_subtractive_notation() {
        assert_eq!(roman_to_int("XIV"), Some(14));
        assert_eq!(roman_to_int("mcmxc"), Some(1990));
        assert_eq!(roman_to_int("XIVb"), None);
    }

    #[test]
    fn person_years_follow_notes_era() {
        assert_eq!(person_year(Some("c. 384"), "384 a.C."), (Some(-384), Era::Bc));
        assert_eq!(person_year(Some("1265"), ""), (Some(1265), Era::Ad));
        assert_eq!(person_year(None, "BC"), (None, Era::Bc));
    }

    #[test]
    fn bc_years_without_negation_are_dropped() {
        assert_eq!(Era::Bc.apply(44), Some(-44));
        assert_eq!(Era::Bc.apply(i64::MIN), None);
        assert_eq!(Era::Ad.apply(i64::MIN), Some(i64::MIN));
    }

    proptest! {
        #[test]
        fn plain_years_are_exact(year in 1i64..100_000) {
            prop_assert_eq!(parse_date_to_range(&year.to_string()), YearSpan::exact(year));
        }

        #[test]
        fn centuries_cover_one_hundred_years(century in 1i64..40) {
            let span = parse_date_to_range(&format!("{century}th century"));
            prop_assert_eq!(span.end.zip(span.start).map(|(e, s)| e - s), Some(99));
        }
    }
}
