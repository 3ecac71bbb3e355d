//! Items found on a single results page

use crate::item::Item;
use std::collections::HashMap;

/// Page-local hash -> item mapping that remembers block order
///
/// Two blocks that hash the same keep the position of the first one and the
/// value of the last one.
#[derive(Debug, Clone, Default)]
pub struct PageItems {
    entries: Vec<(String, Item)>,
    positions: HashMap<String, usize>,
}

impl PageItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, hash: String, item: Item) {
        match self.positions.get(&hash) {
            Some(&index) => self.entries[index].1 = item,
            None => {
                self.positions.insert(hash.clone(), self.entries.len());
                self.entries.push((hash, item));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, hash: &str) -> Option<&Item> {
        self.positions.get(hash).map(|&index| &self.entries[index].1)
    }

    pub fn hashes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(hash, _)| hash.as_str())
    }
}

impl IntoIterator for PageItems {
    type Item = (String, Item);
    type IntoIter = std::vec::IntoIter<(String, Item)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
