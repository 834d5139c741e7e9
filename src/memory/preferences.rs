//! User preferences ("my X is Y" facts)

use std::collections::HashMap;

/// Session-scoped key/value facts stated by the user
///
/// Last write wins. Keys are matched case-insensitively; values are kept
/// exactly as given.
#[derive(Debug, Clone, Default)]
pub struct PreferenceStore {
    values: HashMap<String, String>,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any previous one for the same key
    pub fn remember(&mut self, key: &str, value: &str) -> Option<String> {
        self.values
            .insert(Self::normalize_key(key), value.trim().to_string())
    }

    /// Stored value for `key`, if any
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&Self::normalize_key(key)).map(String::as_str)
    }

    /// Human-readable recall used by the "what is my X" command
    pub fn recall(&self, key: &str) -> String {
        let key = Self::normalize_key(key);
        match self.values.get(&key) {
            Some(value) => format!("Your {} is {}.", key, value),
            None => format!(
                "I don't know your {} yet. Tell me with 'remember that my {} is ...'.",
                key, key
            ),
        }
    }

    /// All preferences sorted by key
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .values
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    fn normalize_key(key: &str) -> String {
        key.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remember_then_recall() {
        let mut prefs = PreferenceStore::new();
        prefs.remember("city", "Paris");
        assert!(prefs.recall("city").contains("Paris"));
    }

    #[test]
    fn test_recall_unknown_signals_absence() {
        let prefs = PreferenceStore::new();
        let reply = prefs.recall("planet");
        assert!(reply.contains("don't"));
        assert!(!reply.contains("Paris"));
    }

    #[test]
    fn test_last_write_wins() {
        let mut prefs = PreferenceStore::new();
        prefs.remember("color", "blue");
        let previous = prefs.remember("Color", "green");
        assert_eq!(previous.as_deref(), Some("blue"));
        assert_eq!(prefs.get("color"), Some("green"));
        assert_eq!(prefs.len(), 1);
    }

    #[test]
    fn test_key_whitespace_is_normalized() {
        let mut prefs = PreferenceStore::new();
        prefs.remember("favorite   food", "pizza");
        assert_eq!(prefs.get("Favorite food"), Some("pizza"));
    }

    #[test]
    fn test_entries_sorted() {
        let mut prefs = PreferenceStore::new();
        prefs.remember("zeta", "1");
        prefs.remember("alpha", "2");
        assert_eq!(prefs.entries(), vec![("alpha", "2"), ("zeta", "1")]);
    }
}
