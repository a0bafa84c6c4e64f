//! Field registry types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::value::FieldValue;

/// Input kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Date,
    Select,
    Checkbox,
    /// Text entered through an input mask (phone numbers, postal codes).
    Masked,
    /// Ordered list of keyed sub-records.
    Collection,
}

impl FieldKind {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Date => "date",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Masked => "masked",
            Self::Collection => "collection",
        }
    }

    /// Value a field of this kind starts with.
    pub fn empty_value(&self) -> FieldValue {
        match self {
            Self::Checkbox => FieldValue::Flag(false),
            Self::Collection => FieldValue::Items(Vec::new()),
            _ => FieldValue::Text(String::new()),
        }
    }

    /// Whether `value` carries the tag this kind stores.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (Self::Checkbox, FieldValue::Flag(_))
                | (Self::Collection, FieldValue::Items(_))
                | (
                    Self::Text
                        | Self::Email
                        | Self::Password
                        | Self::Date
                        | Self::Select
                        | Self::Masked,
                    FieldValue::Text(_)
                )
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One form field: its name, input kind and whether it must be filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldModel {
    name: String,
    kind: FieldKind,
    required: bool,
}

impl FieldModel {
    pub fn new(name: impl Into<String>, kind: FieldKind, required: bool) -> Result<Self, ModelError> {
        let name = name.into();
        if name.trim().is_empty() || name.chars().any(char::is_whitespace) {
            return Err(ModelError::InvalidFieldName(name));
        }
        Ok(Self {
            name,
            kind,
            required,
        })
    }

    pub fn required(name: impl Into<String>, kind: FieldKind) -> Result<Self, ModelError> {
        Self::new(name, kind, true)
    }

    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Result<Self, ModelError> {
        Self::new(name, kind, false)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_names() {
        assert!(FieldModel::required("", FieldKind::Text).is_err());
        assert!(FieldModel::required("first name", FieldKind::Text).is_err());
        assert!(FieldModel::required("firstName", FieldKind::Text).is_ok());
    }

    #[test]
    fn kinds_accept_matching_tags() {
        assert!(FieldKind::Email.accepts(&FieldValue::text("a@b.c")));
        assert!(!FieldKind::Email.accepts(&FieldValue::Flag(true)));
        assert!(FieldKind::Checkbox.accepts(&FieldValue::Flag(false)));
        assert!(FieldKind::Collection.accepts(&FieldValue::Items(vec![])));
        assert!(!FieldKind::Collection.accepts(&FieldValue::text("x")));
    }
}
