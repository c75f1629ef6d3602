use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Insertion-ordered collection of unique strings.
///
/// Serializes as a plain JSON array so fact sheets stay readable by
/// consumers that expect sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedSet {
    items: IndexSet<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `item` unless already present. Returns `true` on insertion.
    pub fn insert(&mut self, item: impl Into<String>) -> bool {
        self.items.insert(item.into())
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.contains(item)
    }

    /// Keep only the items for which `keep` returns `true`, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.items.retain(|item| keep(item));
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.items.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl<'a> IntoIterator for &'a OrderedSet {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_insertion_order() {
        let mut set = OrderedSet::new();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));
        assert_eq!(set.to_vec(), vec!["b", "a"]);
    }

    #[test]
    fn retain_preserves_order() {
        let mut set: OrderedSet = ["x", "y", "z"].into_iter().collect();
        set.retain(|item| item != "y");
        assert_eq!(set.to_vec(), vec!["x", "z"]);
        assert!(!set.contains("y"));
    }

    #[test]
    fn serializes_as_array() {
        let set: OrderedSet = ["one", "two"].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["one","two"]"#);
        let back: OrderedSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
