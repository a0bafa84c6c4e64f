//! Format predicates over single text values.

use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Loose email shape check: something@something.something, no whitespace.
pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Number of ASCII digits, ignoring mask characters such as `(`, `-` and spaces.
pub fn digit_count(value: &str) -> usize {
    value.bytes().filter(u8::is_ascii_digit).count()
}

/// True when only digits and mask punctuation appear.
pub fn is_masked_digits(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '(' | ')' | '-' | '.' | ' ' | '+'))
}

/// Whole number strictly greater than zero.
pub fn is_positive_integer(value: &str) -> bool {
    value.trim().parse::<u32>().is_ok_and(|n| n > 0)
}

/// Parse an ISO `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Date that is not after today (UTC).
pub fn is_past_or_today(date: NaiveDate) -> bool {
    date <= Utc::now().date_naive()
}
