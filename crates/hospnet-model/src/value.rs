//! Tagged field values and collection items.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A field value tagged by the storage its `FieldKind` uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    Items(Vec<CollectionItem>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_items(&self) -> Option<&[CollectionItem]> {
        match self {
            Self::Items(items) => Some(items),
            _ => None,
        }
    }

    /// Blank text, an unset flag or an empty collection.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Flag(b) => !b,
            Self::Items(items) => items.is_empty(),
        }
    }

    /// Convert a loosely-typed JSON answer into a field value.
    ///
    /// Numbers become text, since every numeric input is a text box.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Flag(*b)),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            serde_json::Value::Number(n) => Some(Self::Text(n.to_string())),
            serde_json::Value::Null => Some(Self::Text(String::new())),
            serde_json::Value::Array(values) => values
                .iter()
                .map(CollectionItem::from_json)
                .collect::<Option<Vec<_>>>()
                .map(Self::Items),
            serde_json::Value::Object(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// A keyed sub-record inside a collection field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionItem {
    pub key: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl CollectionItem {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Text of `field`, empty when absent or not text.
    pub fn text(&self, field: &str) -> &str {
        self.get(field).and_then(FieldValue::as_text).unwrap_or("")
    }

    fn from_json(value: &serde_json::Value) -> Option<Self> {
        let object = value.as_object()?;
        let key = object.get("key")?.as_str()?.to_string();
        let mut fields = BTreeMap::new();
        let source = object
            .get("fields")
            .and_then(serde_json::Value::as_object)
            .unwrap_or(object);
        for (name, raw) in source {
            if name == "key" {
                continue;
            }
            fields.insert(name.clone(), FieldValue::from_json(raw)?);
        }
        Some(Self { key, fields })
    }
}
