//! Check predicates evaluated against form data.
//!
//! Every check targets one field, which is the field reported when the check
//! fails. Format checks pass on empty values so that only `Required` reports
//! a missing answer.

pub mod format;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use hospnet_model::{FieldValue, FormData};

/// Whole-form predicate for checks that do not fit the built-in set.
pub type Predicate = Arc<dyn Fn(&FormData) -> bool + Send + Sync>;

/// A single validation check.
#[derive(Clone)]
pub enum Check {
    /// Text not blank, flag set, or collection not empty.
    Required { field: String },
    /// Matches `^[^\s@]+@[^\s@]+\.[^\s@]+$`.
    Email { field: String },
    /// At least `min` characters, counted on the untrimmed value.
    MinLength { field: String, min: usize },
    /// Equal to the value of `other` (e.g. password confirmation).
    Equals { field: String, other: String },
    /// Checkbox must be ticked.
    MustBeTrue { field: String },
    /// Masked input holding exactly `count` digits.
    Digits { field: String, count: usize },
    /// Whole number greater than zero.
    PositiveInteger { field: String },
    /// One of a fixed set of identifiers.
    OneOf { field: String, allowed: Vec<String> },
    /// ISO calendar date, optionally not in the future.
    Date { field: String, not_future: bool },
    /// No two items of a collection share a key.
    UniqueKeys { field: String },
    /// Arbitrary predicate over the whole form.
    Custom { field: String, predicate: Predicate },
}

impl Check {
    /// Field reported when this check fails.
    pub fn field(&self) -> &str {
        match self {
            Self::Required { field }
            | Self::Email { field }
            | Self::MinLength { field, .. }
            | Self::Equals { field, .. }
            | Self::MustBeTrue { field }
            | Self::Digits { field, .. }
            | Self::PositiveInteger { field }
            | Self::OneOf { field, .. }
            | Self::Date { field, .. }
            | Self::UniqueKeys { field }
            | Self::Custom { field, .. } => field,
        }
    }

    /// Short identifier of the check kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Required { .. } => "required",
            Self::Email { .. } => "email",
            Self::MinLength { .. } => "min_length",
            Self::Equals { .. } => "equals",
            Self::MustBeTrue { .. } => "must_be_true",
            Self::Digits { .. } => "digits",
            Self::PositiveInteger { .. } => "positive_integer",
            Self::OneOf { .. } => "one_of",
            Self::Date { .. } => "date",
            Self::UniqueKeys { .. } => "unique_keys",
            Self::Custom { .. } => "custom",
        }
    }

    /// Evaluate the check.
    pub fn passes(&self, data: &FormData) -> bool {
        match self {
            Self::Required { field } => !data.is_empty_value(field),
            Self::MustBeTrue { field } => data.flag(field),
            Self::Equals { field, other } => raw_text(data, field) == raw_text(data, other),
            Self::Custom { predicate, .. } => predicate(data),
            Self::UniqueKeys { field } => {
                let mut seen = BTreeSet::new();
                data.items(field).iter().all(|item| seen.insert(item.key.as_str()))
            }
            Self::Email { field } => skip_empty(data, field, format::is_email),
            Self::MinLength { field, min } => {
                data.is_empty_value(field) || raw_text(data, field).chars().count() >= *min
            }
            Self::Digits { field, count } => skip_empty(data, field, |v| {
                format::is_masked_digits(v) && format::digit_count(v) == *count
            }),
            Self::PositiveInteger { field } => {
                skip_empty(data, field, format::is_positive_integer)
            }
            Self::OneOf { field, allowed } => {
                skip_empty(data, field, |v| allowed.iter().any(|a| a == v))
            }
            Self::Date { field, not_future } => skip_empty(data, field, |v| {
                format::parse_date(v).is_some_and(|d| !*not_future || format::is_past_or_today(d))
            }),
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("kind", &self.kind())
            .field("field", &self.field())
            .finish()
    }
}

/// Untrimmed text, so that passwords are compared exactly.
fn raw_text<'a>(data: &'a FormData, field: &str) -> &'a str {
    data.get(field).and_then(FieldValue::as_text).unwrap_or("")
}

fn skip_empty(data: &FormData, field: &str, pred: impl Fn(&str) -> bool) -> bool {
    let value = data.text(field);
    value.is_empty() || pred(value)
}
