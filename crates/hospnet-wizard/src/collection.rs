//! Ordered, unique-keyed list editing.

use std::collections::BTreeSet;

use hospnet_model::{CollectionItem, FieldValue};

/// Editor over the items of one collection field.
///
/// Keys stay unique under every operation, and items keep insertion order
/// unless explicitly reordered. When the key mirrors one of the item's
/// fields (see [`with_key_field`](Self::with_key_field)), updating that
/// field moves the key with it.
#[derive(Debug)]
pub struct CollectionEditor<'a> {
    field: &'a str,
    key_field: Option<&'a str>,
    items: &'a mut Vec<CollectionItem>,
}

impl<'a> CollectionEditor<'a> {
    pub fn new(field: &'a str, items: &'a mut Vec<CollectionItem>) -> Self {
        Self {
            field,
            key_field: None,
            items,
        }
    }

    /// Declare the item field the key is derived from.
    #[must_use]
    pub fn with_key_field(mut self, key_field: Option<&'a str>) -> Self {
        self.key_field = key_field;
        self
    }

    /// Name of the collection field being edited.
    pub fn field(&self) -> &str {
        self.field
    }

    pub fn items(&self) -> &[CollectionItem] {
        self.items.as_slice()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&CollectionItem> {
        self.items.iter().find(|item| item.key == key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.items.iter().map(|item| item.key.clone()).collect()
    }

    /// Append `item`; rejected without mutation if its key is taken.
    pub fn add(&mut self, item: CollectionItem) -> bool {
        if self.contains(&item.key) {
            tracing::debug!(collection = self.field, key = %item.key, "duplicate key rejected");
            return false;
        }
        self.items.push(item);
        true
    }

    /// Set one payload field of the item with `key`.
    ///
    /// Updating the key field re-keys the item; that is refused when the new
    /// key is blank or already taken. Returns whether anything changed.
    pub fn update(&mut self, key: &str, field: &str, value: impl Into<FieldValue>) -> bool {
        let value = value.into();
        let Some(pos) = self.position(key) else {
            return false;
        };
        if self.key_field == Some(field) {
            let new_key = value.as_text().map(str::trim).unwrap_or("").to_string();
            if new_key.is_empty() || (new_key != key && self.contains(&new_key)) {
                tracing::debug!(collection = self.field, key, %new_key, "re-key rejected");
                return false;
            }
            self.items[pos].key = new_key;
        }
        self.items[pos].fields.insert(field.to_string(), value);
        true
    }

    /// Remove the item with `key`. No-op if absent.
    pub fn remove(&mut self, key: &str) {
        self.items.retain(|item| item.key != key);
    }

    /// Replace the ordering. Fails unless `order` is a permutation of the
    /// current keys.
    pub fn reorder<S: AsRef<str>>(&mut self, order: &[S]) -> bool {
        if order.len() != self.items.len() {
            return false;
        }
        let wanted: BTreeSet<&str> = order.iter().map(AsRef::as_ref).collect();
        if wanted.len() != order.len()
            || !self.items.iter().all(|i| wanted.contains(i.key.as_str()))
        {
            return false;
        }

        let mut remaining = std::mem::take(&mut *self.items);
        for key in order {
            // Presence was checked above.
            if let Some(pos) = remaining.iter().position(|i| i.key == key.as_ref()) {
                self.items.push(remaining.swap_remove(pos));
            }
        }
        true
    }

    /// Drag-and-drop adapter: move the item at `from` to index `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        let len = self.items.len();
        if from >= len || to >= len {
            return false;
        }
        let mut order = self.keys();
        let key = order.remove(from);
        order.insert(to, key);
        self.reorder(order.as_slice())
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|item| item.key == key)
    }
}
