//! Key Index Module
//!
//! Tracks which cache keys were stored under each resource so a whole
//! resource can be invalidated without guessing its key space.

use std::collections::{HashMap, HashSet};

// == Key Index ==
/// Secondary index from resource tag to the keys currently cached for it.
///
/// A key belongs to at most one resource. The index only ever holds keys that
/// are present in the owning store; the store prunes it on every removal.
#[derive(Debug, Default)]
pub struct KeyIndex {
    /// Keys grouped by resource
    by_resource: HashMap<String, HashSet<String>>,
    /// Reverse lookup from key to its resource
    owner: HashMap<String, String>,
}

impl KeyIndex {
    // == Constructor ==
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    // == Track ==
    /// Records `key` under `resource`, moving it if it was tracked elsewhere.
    pub fn track(&mut self, resource: &str, key: &str) {
        if self.owner.get(key).map(String::as_str) == Some(resource) {
            return;
        }
        self.untrack(key);
        self.by_resource
            .entry(resource.to_string())
            .or_default()
            .insert(key.to_string());
        self.owner.insert(key.to_string(), resource.to_string());
    }

    // == Untrack ==
    /// Forgets `key`. No-op for keys that were never tracked.
    pub fn untrack(&mut self, key: &str) {
        let Some(resource) = self.owner.remove(key) else {
            return;
        };
        if let Some(keys) = self.by_resource.get_mut(&resource) {
            keys.remove(key);
            if keys.is_empty() {
                self.by_resource.remove(&resource);
            }
        }
    }

    // == Take Resource ==
    /// Removes and returns every key tracked under `resource`.
    pub fn take_resource(&mut self, resource: &str) -> Vec<String> {
        let keys: Vec<String> = self
            .by_resource
            .remove(resource)
            .map(|keys| keys.into_iter().collect())
            .unwrap_or_default();
        for key in &keys {
            self.owner.remove(key);
        }
        keys
    }

    // == Keys For ==
    /// Returns the keys tracked under `resource`, sorted for stable output.
    pub fn keys_for(&self, resource: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .by_resource
            .get(resource)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.by_resource.clear();
        self.owner.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys across all resources.
    pub fn len(&self) -> usize {
        self.owner.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.owner.is_empty()
    }

    // == Contains ==
    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.owner.contains_key(key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_new() {
        let index = KeyIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_track_groups_by_resource() {
        let mut index = KeyIndex::new();

        index.track("listing", "listing_1_10");
        index.track("listing", "listing_2_10");
        index.track("detail", "detail_7");

        assert_eq!(index.len(), 3);
        assert_eq!(
            index.keys_for("listing"),
            vec!["listing_1_10".to_string(), "listing_2_10".to_string()]
        );
        assert_eq!(index.keys_for("detail"), vec!["detail_7".to_string()]);
    }

    #[test]
    fn test_track_same_key_twice() {
        let mut index = KeyIndex::new();

        index.track("listing", "listing_1_10");
        index.track("listing", "listing_1_10");

        assert_eq!(index.len(), 1);
        assert_eq!(index.keys_for("listing").len(), 1);
    }

    #[test]
    fn test_track_moves_key_between_resources() {
        let mut index = KeyIndex::new();

        index.track("a", "shared");
        index.track("b", "shared");

        assert!(index.keys_for("a").is_empty());
        assert_eq!(index.keys_for("b"), vec!["shared".to_string()]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_untrack() {
        let mut index = KeyIndex::new();

        index.track("listing", "listing_1_10");
        index.track("listing", "listing_2_10");
        index.untrack("listing_1_10");

        assert!(!index.contains("listing_1_10"));
        assert!(index.contains("listing_2_10"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_untrack_unknown_key() {
        let mut index = KeyIndex::new();
        index.track("listing", "listing_1_10");

        index.untrack("nonexistent");

        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_take_resource() {
        let mut index = KeyIndex::new();

        index.track("listing", "listing_1_5");
        index.track("listing", "listing_3_50");
        index.track("detail", "detail_7");

        let mut taken = index.take_resource("listing");
        taken.sort();

        assert_eq!(taken, vec!["listing_1_5".to_string(), "listing_3_50".to_string()]);
        assert!(index.keys_for("listing").is_empty());
        assert!(index.contains("detail_7"));
        assert!(index.take_resource("listing").is_empty());
    }

    #[test]
    fn test_clear() {
        let mut index = KeyIndex::new();
        index.track("listing", "listing_1_10");
        index.track("detail", "detail_7");

        index.clear();

        assert!(index.is_empty());
        assert!(index.keys_for("detail").is_empty());
    }
}
