//! Block-to-item assignment.

use std::collections::{BTreeMap, HashMap};

use serde::{Serialize, Serializer};

use crate::ids::sort_natural_by;

/// Mapping of blocks to the item each one stores.
///
/// Each block holds at most one item; an item may own several blocks,
/// kept in the order they were assigned.
///
/// # Examples
///
/// ```
/// use u_slotting::models::Assignment;
///
/// let mut a = Assignment::new();
/// assert!(a.assign("b1", "A"));
/// assert!(a.assign("b2", "A"));
/// assert!(!a.assign("b1", "B")); // already taken
/// assert_eq!(a.blocks_of("A"), &["b1".to_string(), "b2".to_string()]);
/// assert_eq!(a.item_at("b2"), Some("A"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    by_block: HashMap<String, String>,
    by_item: BTreeMap<String, Vec<String>>,
}

impl Assignment {
    /// Creates an empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `block` to `item`.
    ///
    /// Returns `false` and leaves the assignment unchanged if the block is
    /// already taken.
    pub fn assign(&mut self, block: impl Into<String>, item: impl Into<String>) -> bool {
        let block = block.into();
        if self.by_block.contains_key(&block) {
            return false;
        }
        let item = item.into();
        self.by_item
            .entry(item.clone())
            .or_default()
            .push(block.clone());
        self.by_block.insert(block, item);
        true
    }

    /// Item stored at `block`, if any.
    pub fn item_at(&self, block: &str) -> Option<&str> {
        self.by_block.get(block).map(String::as_str)
    }

    /// Blocks assigned to `item`, in assignment order.
    pub fn blocks_of(&self, item: &str) -> &[String] {
        self.by_item.get(item).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if the item owns at least one block.
    pub fn is_placed(&self, item: &str) -> bool {
        self.by_item.contains_key(item)
    }

    /// Number of assigned blocks.
    pub fn len(&self) -> usize {
        self.by_block.len()
    }

    /// Returns `true` if no block is assigned.
    pub fn is_empty(&self) -> bool {
        self.by_block.is_empty()
    }

    /// Placed items in ascending id order with their blocks.
    pub fn items(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.by_item
            .iter()
            .map(|(item, blocks)| (item.as_str(), blocks.as_slice()))
    }

    /// `(block, item)` pairs in natural block order.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<_> = self
            .by_block
            .iter()
            .map(|(b, i)| (b.as_str(), i.as_str()))
            .collect();
        sort_natural_by(&mut pairs, |pair| pair.0);
        pairs
    }
}

impl Serialize for Assignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.pairs())
    }
}
