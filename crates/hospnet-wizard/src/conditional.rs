//! Declarative conditional sections.
//!
//! A section makes a group of dependent fields visible (and included in the
//! submission) only while a guard predicate holds for another field's value.
//! Rendering, validation and submission all consult the same resolver, so a
//! hidden field can never be validated or submitted.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use hospnet_model::{FieldValue, FormData};

/// Predicate over the current value of a guard field.
#[derive(Clone)]
pub enum GuardPredicate {
    /// Checkbox ticked, or text/collection non-empty.
    Truthy,
    /// Exactly this value.
    Equals(FieldValue),
    /// Non-empty text that is none of the listed "no choice" values.
    ChosenExcept(Vec<String>),
    Custom(Arc<dyn Fn(Option<&FieldValue>) -> bool + Send + Sync>),
}

impl GuardPredicate {
    pub fn chosen_except<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ChosenExcept(values.into_iter().map(Into::into).collect())
    }

    pub fn holds(&self, value: Option<&FieldValue>) -> bool {
        match self {
            Self::Truthy => value.is_some_and(|v| !v.is_empty()),
            Self::Equals(expected) => value == Some(expected),
            Self::ChosenExcept(none_values) => match value.and_then(FieldValue::as_text) {
                Some(text) => {
                    let text = text.trim();
                    !text.is_empty() && !none_values.iter().any(|n| n.eq_ignore_ascii_case(text))
                }
                None => false,
            },
            Self::Custom(predicate) => predicate(value),
        }
    }
}

impl fmt::Debug for GuardPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truthy => f.write_str("Truthy"),
            Self::Equals(v) => f.debug_tuple("Equals").field(v).finish(),
            Self::ChosenExcept(v) => f.debug_tuple("ChosenExcept").field(v).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Rule tying the visibility of `dependent_fields` to `guard_field`.
#[derive(Debug, Clone)]
pub struct ConditionalSection {
    pub guard_field: String,
    pub predicate: GuardPredicate,
    pub dependent_fields: BTreeSet<String>,
}

impl ConditionalSection {
    pub fn new<I, S>(guard_field: impl Into<String>, predicate: GuardPredicate, dependents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            guard_field: guard_field.into(),
            predicate,
            dependent_fields: dependents.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_open(&self, data: &FormData) -> bool {
        self.predicate.holds(data.get(&self.guard_field))
    }
}

/// Dependent fields whose sections are currently open.
///
/// A field named by several sections is active only if every one of them is
/// open.
pub fn resolve(data: &FormData, sections: &[ConditionalSection]) -> BTreeSet<String> {
    let (open, closed): (Vec<_>, Vec<_>) = sections.iter().partition(|s| s.is_open(data));
    let hidden: BTreeSet<&String> = closed.iter().flat_map(|s| &s.dependent_fields).collect();
    open.iter()
        .flat_map(|s| &s.dependent_fields)
        .filter(|f| !hidden.contains(f))
        .cloned()
        .collect()
}

/// Computes the visible field set of a wizard from its registry and sections.
#[derive(Debug, Clone, Default)]
pub struct ConditionalSectionResolver {
    fields: BTreeSet<String>,
    sections: Vec<ConditionalSection>,
}

impl ConditionalSectionResolver {
    pub fn new(fields: BTreeSet<String>, sections: Vec<ConditionalSection>) -> Self {
        Self { fields, sections }
    }

    pub fn sections(&self) -> &[ConditionalSection] {
        &self.sections
    }

    /// Whether `field` is a dependent of any section.
    pub fn is_conditional(&self, field: &str) -> bool {
        self.sections
            .iter()
            .any(|s| s.dependent_fields.contains(field))
    }

    /// Every registered field that is not hidden by a closed section.
    pub fn active_fields(&self, data: &FormData) -> BTreeSet<String> {
        let open_dependents = resolve(data, &self.sections);
        self.fields
            .iter()
            .filter(|f| !self.is_conditional(f) || open_dependents.contains(*f))
            .cloned()
            .collect()
    }
}
