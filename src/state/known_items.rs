//! Known-items set: identity hash -> item

use crate::item::Item;
use std::collections::HashMap;

/// Items a crawl session has already processed
///
/// Presence of a hash means the item has been processed in this session (or
/// loaded from storage), whether or not it has been persisted yet.
#[derive(Debug, Clone, Default)]
pub struct KnownItems {
    items: HashMap<String, Item>,
}

impl KnownItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.items.contains_key(hash)
    }

    pub fn get(&self, hash: &str) -> Option<&Item> {
        self.items.get(hash)
    }

    /// Registers an item under its hash
    ///
    /// Returns false, leaving the stored item untouched, if the hash is
    /// already known.
    pub fn insert(&mut self, hash: String, item: Item) -> bool {
        if self.items.contains_key(&hash) {
            return false;
        }
        self.items.insert(hash, item);
        true
    }

    /// Discards everything and takes `items` as the new contents
    pub fn replace(&mut self, items: HashMap<String, Item>) {
        self.items = items;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Item)> {
        self.items.iter()
    }
}

impl FromIterator<(String, Item)> for KnownItems {
    fn from_iter<I: IntoIterator<Item = (String, Item)>>(iter: I) -> Self {
        let mut known = Self::new();
        for (hash, item) in iter {
            known.insert(hash, item);
        }
        known
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str) -> Item {
        Item {
            price: 10,
            title: title.to_string(),
            url: format!("/x/{}", title),
            category: "c".to_string(),
            company: String::new(),
            location: String::new(),
            date: "01 01".to_string(),
            photourls: vec![],
        }
    }

    #[test]
    fn test_insert_new_hash() {
        let mut known = KnownItems::new();
        assert!(known.insert("h1".to_string(), item("a")));
        assert!(known.contains("h1"));
        assert_eq!(known.len(), 1);
    }

    #[test]
    fn test_insert_existing_hash_keeps_first_item() {
        let mut known = KnownItems::new();
        known.insert("h1".to_string(), item("a"));

        assert!(!known.insert("h1".to_string(), item("b")));
        assert_eq!(known.len(), 1);
        assert_eq!(known.get("h1").unwrap().title, "a");
    }

    #[test]
    fn test_replace_discards_previous_contents() {
        let mut known: KnownItems = vec![("h1".to_string(), item("a"))].into_iter().collect();

        let mut fresh = HashMap::new();
        fresh.insert("h2".to_string(), item("b"));
        known.replace(fresh);

        assert!(!known.contains("h1"));
        assert!(known.contains("h2"));
        assert_eq!(known.len(), 1);
    }
}
