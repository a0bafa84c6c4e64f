//! Answers files: a JSON object mapping field names to values.

use std::collections::BTreeMap;

use hospnet_model::FieldValue;
use hospnet_wizard::WizardDefinition;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnswersError {
    #[error("answers file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("answers must be a JSON object of field names to values")]
    NotAnObject,

    #[error("unsupported value for field '{0}'")]
    UnsupportedValue(String),

    #[error("unknown field '{field}' for wizard '{wizard}'")]
    UnknownField { wizard: String, field: String },
}

/// Parsed answers, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Answers {
    values: BTreeMap<String, FieldValue>,
}

impl Answers {
    pub fn parse(text: &str) -> Result<Self, AnswersError> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        let serde_json::Value::Object(object) = json else {
            return Err(AnswersError::NotAnObject);
        };
        let values = object
            .iter()
            .map(|(name, value)| {
                FieldValue::from_json(value)
                    .map(|value| (name.clone(), value))
                    .ok_or_else(|| AnswersError::UnsupportedValue(name.clone()))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { values })
    }

    /// Fail on the first answer naming a field the wizard does not have.
    pub fn check_fields(&self, definition: &WizardDefinition) -> Result<(), AnswersError> {
        match self.values.keys().find(|name| definition.field(name).is_none()) {
            Some(name) => Err(AnswersError::UnknownField {
                wizard: definition.id().to_string(),
                field: name.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_become_text() {
        let answers = Answers::parse(r#"{"number": 42, "hasAcceptedTerms": true}"#).unwrap();
        assert_eq!(answers.get("number"), Some(&FieldValue::text("42")));
        assert_eq!(answers.get("hasAcceptedTerms"), Some(&FieldValue::Flag(true)));
    }

    #[test]
    fn rejects_non_objects() {
        assert!(matches!(Answers::parse("[1, 2]"), Err(AnswersError::NotAnObject)));
        assert!(matches!(
            Answers::parse(r#"{"address": {"city": "Recife"}}"#),
            Err(AnswersError::UnsupportedValue(field)) if field == "address"
        ));
    }
}
