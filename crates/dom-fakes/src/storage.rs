//! In-memory `localStorage` replacement.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

/// Fake `localStorage`
///
/// Values are stored as strings. As with the usual `store[key] || null`
/// mock, an empty string reads back as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalStorageMock {
    store: HashMap<String, String>,
}

impl LocalStorageMock {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Read a value
    #[must_use]
    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.store
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Store the string form of `value`
    pub fn set_item(&mut self, key: impl Into<String>, value: impl Display) {
        self.store.insert(key.into(), value.to_string());
    }

    /// Remove a value
    pub fn remove_item(&mut self, key: &str) {
        self.store.remove(key);
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Stored keys, sorted
    #[must_use]
    pub fn key_names(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.store.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut storage = LocalStorageMock::new();
        storage.set_item("token", "abc");
        assert_eq!(storage.get_item("token"), Some("abc"));
        assert_eq!(storage.get_item("missing"), None);
    }

    #[test]
    fn test_values_stringified() {
        let mut storage = LocalStorageMock::new();
        storage.set_item("count", 42);
        storage.set_item("flag", true);
        assert_eq!(storage.get_item("count"), Some("42"));
        assert_eq!(storage.get_item("flag"), Some("true"));
    }

    #[test]
    fn test_empty_string_reads_as_absent() {
        let mut storage = LocalStorageMock::new();
        storage.set_item("blank", "");
        assert_eq!(storage.get_item("blank"), None);
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut storage = LocalStorageMock::new();
        storage.set_item("a", 1);
        storage.set_item("b", 2);
        storage.remove_item("a");
        assert_eq!(storage.key_names(), vec!["b".to_string()]);

        storage.clear();
        assert!(storage.is_empty());
    }
}
