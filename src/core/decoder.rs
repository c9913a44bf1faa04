//! Freshness-code validation and decoding.
//!
//! A code is `[A-L][D][D][Y]`: month letter, two-digit day, last digit of the year
//! inside the current decade.

use crate::domain::model::DATE_FORMAT;
use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use thiserror::Error;

pub const DEFAULT_FRESHNESS_PATTERN: &str = r"^[A-L](0[1-9]|[12][0-9]|3[01])[0-9]$";

pub const MONTH_LETTERS: [&str; 12] = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"];

/// Reference years at or below this are rejected outright.
pub const REFERENCE_YEAR_FLOOR: i32 = 2024;

const CODE_LEN: usize = 4;
const SKU_LEN: usize = 7;

/// A caller-supplied code pattern, always applied as a full match.
#[derive(Debug, Clone)]
pub struct FreshnessPattern {
    source: String,
    regex: Regex,
}

impl FreshnessPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn full_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl Default for FreshnessPattern {
    fn default() -> Self {
        Self::new(DEFAULT_FRESHNESS_PATTERN).expect("default freshness pattern compiles")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("code '{0}' is not a letter followed by three digits")]
    Malformed(String),
    #[error("day {0} is out of range")]
    DayOutOfRange(u32),
    #[error("month {0} is out of range")]
    MonthOutOfRange(u32),
    #[error("reference year {0} is not after 2024")]
    YearBeforeFloor(i32),
    #[error("{day:02}/{month:02}/{year} is not a calendar date")]
    ImpossibleDate { year: i32, month: u32, day: u32 },
}

/// Syntactic check of a freshness code. Never panics.
pub fn validate(pattern: &FreshnessPattern, text: &str) -> bool {
    let bare_letter = text
        .split_whitespace()
        .any(|token| MONTH_LETTERS.contains(&token));

    if bare_letter || text.chars().count() != CODE_LEN {
        return false;
    }
    if !text.chars().all(char::is_alphanumeric) {
        return false;
    }
    pattern.full_match(text)
}

pub fn validate_sku(text: &str) -> bool {
    let text = text.trim();
    text.len() == SKU_LEN && text.chars().all(|c| c.is_ascii_digit())
}

/// Decode against the current year, formatted `DD/MM/YYYY`.
pub fn decode(code: &str) -> Result<String, DecodeError> {
    let date = decode_date(code, Local::now().year())?;
    Ok(date.format(DATE_FORMAT).to_string())
}

/// Decode against an explicit reference year; the resolved year shares its decade.
pub fn decode_date(code: &str, reference_year: i32) -> Result<NaiveDate, DecodeError> {
    let chars: Vec<char> = code.chars().collect();
    let malformed = || DecodeError::Malformed(code.to_string());

    let (letter, day_digits, year_digit) = match chars.as_slice() {
        [letter, d1, d2, y] if letter.is_ascii_uppercase() => (*letter, [*d1, *d2], *y),
        _ => return Err(malformed()),
    };

    let month = (letter as u32) - ('A' as u32) + 1;
    let day: u32 = day_digits
        .iter()
        .collect::<String>()
        .parse()
        .map_err(|_| malformed())?;
    let last_digit = year_digit.to_digit(10).ok_or_else(malformed)? as i32;
    let year = (reference_year / 10) * 10 + last_digit;

    if day >= 32 {
        return Err(DecodeError::DayOutOfRange(day));
    }
    if month >= 13 {
        return Err(DecodeError::MonthOutOfRange(month));
    }
    if reference_year <= REFERENCE_YEAR_FLOOR {
        return Err(DecodeError::YearBeforeFloor(reference_year));
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(DecodeError::ImpossibleDate { year, month, day })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> FreshnessPattern {
        FreshnessPattern::default()
    }

    #[test]
    fn test_validate_accepts_well_formed_codes() {
        for code in ["J305", "A010", "L319", "F135"] {
            assert!(validate(&pattern(), code), "{code} should be valid");
        }
    }

    #[test]
    fn test_validate_rejects_wrong_length() {
        for code in ["", "J", "J30", "J3055", "J305 ", " J305", "J30512345"] {
            assert!(!validate(&pattern(), code), "{code:?} should be invalid");
        }
    }

    #[test]
    fn test_validate_rejects_letters_outside_a_to_l() {
        assert!(!validate(&pattern(), "Z135"));
        assert!(!validate(&pattern(), "M085"));
        assert!(!validate(&pattern(), "j305"));
    }

    #[test]
    fn test_validate_rejects_impossible_day_digits() {
        assert!(!validate(&pattern(), "J005"));
        assert!(!validate(&pattern(), "J325"));
        assert!(!validate(&pattern(), "J345"));
    }

    #[test]
    fn test_validate_rejects_bare_month_letters_and_symbols() {
        assert!(!validate(&pattern(), "A"));
        assert!(!validate(&pattern(), "A B "));
        assert!(!validate(&pattern(), "J-05"));
        assert!(!validate(&pattern(), "J3.5"));
    }

    #[test]
    fn test_validate_uses_injected_pattern() {
        let loose = FreshnessPattern::new("[A-Z][0-9]{3}").unwrap();
        assert!(validate(&loose, "Z135"));
        assert!(!validate(&loose, "Z13"));

        // anchoring is applied even when the pattern omits it
        let unanchored = FreshnessPattern::new("[A-L][0-9]{2}").unwrap();
        assert!(!validate(&unanchored, "J305"));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(FreshnessPattern::new("[A-L").is_err());
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("3017868"));
        assert!(validate_sku("  3010443 "));
        assert!(!validate_sku("30173672"));
        assert!(!validate_sku("301786"));
        assert!(!validate_sku("30178a8"));
        assert!(!validate_sku(""));
    }

    #[test]
    fn test_decode_date_resolves_within_decade() {
        let date = decode_date("J305", 2026).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 10, 30).unwrap());

        let date = decode_date("A019", 2031).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2039, 1, 1).unwrap());
    }

    #[test]
    fn test_decode_date_rejects_reference_year_at_floor() {
        assert_eq!(
            decode_date("J305", 2024),
            Err(DecodeError::YearBeforeFloor(2024))
        );
        assert!(decode_date("J305", 2025).is_ok());
    }

    #[test]
    fn test_decode_date_rejects_impossible_dates() {
        // April has 30 days
        assert!(matches!(
            decode_date("D315", 2026),
            Err(DecodeError::ImpossibleDate { month: 4, day: 31, .. })
        ));
        assert!(matches!(
            decode_date("J005", 2026),
            Err(DecodeError::ImpossibleDate { day: 0, .. })
        ));
        // 2025 is not a leap year
        assert!(decode_date("B295", 2026).is_err());
        assert!(decode_date("B294", 2026).is_ok());
    }

    #[test]
    fn test_decode_date_range_checks() {
        assert_eq!(decode_date("J325", 2026), Err(DecodeError::DayOutOfRange(32)));
        assert_eq!(decode_date("M105", 2026), Err(DecodeError::MonthOutOfRange(13)));
    }

    #[test]
    fn test_decode_date_malformed_input() {
        assert!(matches!(decode_date("J3a5", 2026), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode_date("J30", 2026), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode_date("5305", 2026), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_formats_dd_mm_yyyy() {
        let text = decode("J305").unwrap();
        let year = Local::now().year();
        assert_eq!(text, format!("30/10/{}", (year / 10) * 10 + 5));
    }

    #[test]
    fn test_decode_is_deterministic() {
        assert_eq!(decode_date("F135", 2026), decode_date("F135", 2026));
    }
}
