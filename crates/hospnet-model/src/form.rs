//! Accumulated wizard form data.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::value::{CollectionItem, FieldValue};

/// Field name to value mapping. Keys accumulate and are never removed by the
/// wizard; a filtered copy is produced for submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    values: BTreeMap<String, FieldValue>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.values.get_mut(name)
    }

    /// Insert or overwrite a value, returning the previous one.
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.values.insert(name.into(), value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Trimmed text of `name`; empty when absent or not text.
    pub fn text(&self, name: &str) -> &str {
        self.get(name)
            .and_then(FieldValue::as_text)
            .map(str::trim)
            .unwrap_or("")
    }

    /// Checkbox state of `name`; false when absent.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(FieldValue::as_flag).unwrap_or(false)
    }

    /// Items of a collection field; empty when absent.
    pub fn items(&self, name: &str) -> &[CollectionItem] {
        self.get(name).and_then(FieldValue::as_items).unwrap_or(&[])
    }

    pub fn is_empty_value(&self, name: &str) -> bool {
        self.get(name).is_none_or(FieldValue::is_empty)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Copy containing only the named fields.
    pub fn retain_only(&self, names: &BTreeSet<String>) -> Self {
        Self {
            values: self
                .values
                .iter()
                .filter(|(k, _)| names.contains(*k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

impl FromIterator<(String, FieldValue)> for FormData {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
