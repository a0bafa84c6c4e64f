//! Named rules and ordered rule sets.

use std::sync::Arc;

use hospnet_model::FormData;

use crate::checks::Check;
use crate::result::{FieldError, ValidationResult};

/// A named check with the message shown when it fails.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub check: Check,
    pub message: String,
}

impl Rule {
    pub fn new(name: impl Into<String>, check: Check, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            check,
            message: message.into(),
        }
    }

    pub fn field(&self) -> &str {
        self.check.field()
    }

    fn error(&self) -> FieldError {
        FieldError::new(self.check.field(), self.message.clone())
    }
}

/// Rules evaluated in insertion order, stopping at the first failure.
///
/// The order is part of the contract: it decides which error the user sees
/// when several answers are wrong at once.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn required(self, field: &str, message: &str) -> Self {
        self.rule(Rule::new(
            format!("{field}.required"),
            Check::Required {
                field: field.to_string(),
            },
            message,
        ))
    }

    #[must_use]
    pub fn email(self, field: &str, message: &str) -> Self {
        self.rule(Rule::new(
            format!("{field}.email"),
            Check::Email {
                field: field.to_string(),
            },
            message,
        ))
    }

    #[must_use]
    pub fn min_length(self, field: &str, min: usize, message: &str) -> Self {
        self.rule(Rule::new(
            format!("{field}.min_length"),
            Check::MinLength {
                field: field.to_string(),
                min,
            },
            message,
        ))
    }

    #[must_use]
    pub fn equals(self, field: &str, other: &str, message: &str) -> Self {
        self.rule(Rule::new(
            format!("{field}.equals"),
            Check::Equals {
                field: field.to_string(),
                other: other.to_string(),
            },
            message,
        ))
    }

    #[must_use]
    pub fn must_be_true(self, field: &str, message: &str) -> Self {
        self.rule(Rule::new(
            format!("{field}.must_be_true"),
            Check::MustBeTrue {
                field: field.to_string(),
            },
            message,
        ))
    }

    #[must_use]
    pub fn digits(self, field: &str, count: usize, message: &str) -> Self {
        self.rule(Rule::new(
            format!("{field}.digits"),
            Check::Digits {
                field: field.to_string(),
                count,
            },
            message,
        ))
    }

    #[must_use]
    pub fn positive_integer(self, field: &str, message: &str) -> Self {
        self.rule(Rule::new(
            format!("{field}.positive_integer"),
            Check::PositiveInteger {
                field: field.to_string(),
            },
            message,
        ))
    }

    #[must_use]
    pub fn one_of<I, S>(self, field: &str, allowed: I, message: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule(Rule::new(
            format!("{field}.one_of"),
            Check::OneOf {
                field: field.to_string(),
                allowed: allowed.into_iter().map(Into::into).collect(),
            },
            message,
        ))
    }

    #[must_use]
    pub fn date(self, field: &str, not_future: bool, message: &str) -> Self {
        self.rule(Rule::new(
            format!("{field}.date"),
            Check::Date {
                field: field.to_string(),
                not_future,
            },
            message,
        ))
    }

    #[must_use]
    pub fn unique_keys(self, field: &str, message: &str) -> Self {
        self.rule(Rule::new(
            format!("{field}.unique_keys"),
            Check::UniqueKeys {
                field: field.to_string(),
            },
            message,
        ))
    }

    #[must_use]
    pub fn custom<F>(self, name: &str, field: &str, predicate: F, message: &str) -> Self
    where
        F: Fn(&FormData) -> bool + Send + Sync + 'static,
    {
        self.rule(Rule::new(
            name,
            Check::Custom {
                field: field.to_string(),
                predicate: Arc::new(predicate),
            },
            message,
        ))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Fields referenced by any rule.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(Rule::field)
    }

    /// Evaluate every rule against `data`.
    pub fn evaluate(&self, data: &FormData) -> ValidationResult {
        self.evaluate_active(data, |_| true)
    }

    /// Evaluate rules whose target field is currently active.
    ///
    /// Rules on inactive fields (hidden conditional sections) are skipped.
    pub fn evaluate_active(&self, data: &FormData, is_active: impl Fn(&str) -> bool) -> ValidationResult {
        for rule in &self.rules {
            if !is_active(rule.field()) {
                continue;
            }
            if !rule.check.passes(data) {
                tracing::debug!(rule = %rule.name, field = rule.field(), "validation rule failed");
                return ValidationResult::invalid(rule.error());
            }
        }
        ValidationResult::valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hospnet_model::FieldValue;

    fn data(pairs: &[(&str, FieldValue)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn first_failure_wins() {
        let rules = RuleSet::new()
            .required("name", "Nome é obrigatório")
            .required("email", "Email é obrigatório");
        let result = rules.evaluate(&FormData::new());
        assert!(!result.ok);
        assert_eq!(result.first_error.unwrap().field, "name");
    }

    #[test]
    fn inactive_fields_are_skipped() {
        let rules = RuleSet::new()
            .required("insuranceNumber", "Número da carteirinha é obrigatório")
            .required("name", "Nome é obrigatório");
        let result = rules.evaluate_active(
            &data(&[("name", FieldValue::text("Ana"))]),
            |f| f != "insuranceNumber",
        );
        assert!(result.ok);
    }

    #[test]
    fn rule_names_default_to_field_and_kind() {
        let rules = RuleSet::new().email("email", "Email inválido");
        assert_eq!(rules.rules()[0].name, "email.email");
        assert_eq!(rules.fields().collect::<Vec<_>>(), vec!["email"]);
    }
}
