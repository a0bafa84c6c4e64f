//! Validation outcome types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The failing field and the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for FieldError {}

/// Result of validating one step. Only the first failing rule is reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub ok: bool,
    pub first_error: Option<FieldError>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            ok: true,
            first_error: None,
        }
    }

    pub fn invalid(error: FieldError) -> Self {
        Self {
            ok: false,
            first_error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Convert into a `Result`, yielding the first error on failure.
    pub fn into_result(self) -> Result<(), FieldError> {
        match self.first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let result = ValidationResult::invalid(FieldError::new("email", "Email inválido"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["firstError"]["field"], "email");
        assert_eq!(json["firstError"]["message"], "Email inválido");
    }

    #[test]
    fn into_result_maps_error() {
        assert!(ValidationResult::valid().into_result().is_ok());
        let err = ValidationResult::invalid(FieldError::new("name", "x"))
            .into_result()
            .unwrap_err();
        assert_eq!(err.field, "name");
    }
}
