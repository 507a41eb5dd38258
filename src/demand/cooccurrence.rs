//! Symmetric item-pair co-occurrence counts.

use std::collections::HashMap;

use crate::ids::natural_cmp;
use crate::models::Order;

/// Number of orders in which each unordered pair of items appears together.
///
/// Pairs are stored once under a normalised key, so `get(a, b)` and
/// `get(b, a)` always agree. Per-item totals over all partners are kept
/// alongside for priority normalisation.
///
/// # Examples
///
/// ```
/// use u_slotting::demand::CoOccurrence;
/// use u_slotting::models::{Order, OrderKey};
///
/// let mut o1 = Order::new(OrderKey::customer("p1"));
/// o1.add("A", 1).unwrap();
/// o1.add("B", 1).unwrap();
/// let mut o2 = Order::new(OrderKey::customer("p2"));
/// o2.add("A", 2).unwrap();
/// o2.add("B", 1).unwrap();
/// o2.add("C", 1).unwrap();
///
/// let cooc = CoOccurrence::from_orders(&[o1, o2]);
/// assert_eq!(cooc.get("A", "B"), 2);
/// assert_eq!(cooc.get("C", "A"), 1);
/// assert_eq!(cooc.total_for("A"), 3);
/// assert_eq!(cooc.max_total(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoOccurrence {
    counts: HashMap<(String, String), u32>,
    totals: HashMap<String, u32>,
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl CoOccurrence {
    /// Creates an empty co-occurrence table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts pairs over the distinct items of each order.
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut cooc = Self::new();
        for order in orders {
            let items: Vec<&str> = order.items().collect();
            for (idx, a) in items.iter().enumerate() {
                for b in &items[idx + 1..] {
                    cooc.add(a, b, 1);
                }
            }
        }
        cooc
    }

    /// Builds a table from explicit `(a, b, count)` triples.
    ///
    /// Repeated pairs accumulate; self-pairs are ignored.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str, u32)>) -> Self {
        let mut cooc = Self::new();
        for (a, b, n) in pairs {
            cooc.add(a, b, n);
        }
        cooc
    }

    fn add(&mut self, a: &str, b: &str, n: u32) {
        if a == b || n == 0 {
            return;
        }
        let slot = self.counts.entry(pair_key(a, b)).or_insert(0);
        *slot = slot.saturating_add(n);
        let slot = self.totals.entry(a.to_string()).or_insert(0);
        *slot = slot.saturating_add(n);
        let slot = self.totals.entry(b.to_string()).or_insert(0);
        *slot = slot.saturating_add(n);
    }

    /// Orders containing both `a` and `b` (0 for unknown pairs and `a == b`).
    pub fn get(&self, a: &str, b: &str) -> u32 {
        if a == b {
            return 0;
        }
        self.counts.get(&pair_key(a, b)).copied().unwrap_or(0)
    }

    /// Sum of `get(item, j)` over every other item `j`.
    pub fn total_for(&self, item: &str) -> u32 {
        self.totals.get(item).copied().unwrap_or(0)
    }

    /// Largest per-item total; the global affinity normaliser.
    pub fn max_total(&self) -> u32 {
        self.totals.values().copied().max().unwrap_or(0)
    }

    /// Number of distinct co-occurring pairs.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if no pair co-occurs.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(a, b, count)` triples with `a < b`, in natural order.
    pub fn pairs(&self) -> Vec<(&str, &str, u32)> {
        let mut pairs: Vec<_> = self
            .counts
            .iter()
            .map(|((a, b), &n)| (a.as_str(), b.as_str(), n))
            .collect();
        pairs.sort_by(|x, y| natural_cmp(x.0, y.0).then_with(|| natural_cmp(x.1, y.1)));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderKey;

    fn order(customer: &str, items: &[(&str, u64)]) -> Order {
        let mut o = Order::new(OrderKey::customer(customer));
        for &(item, qty) in items {
            o.add(item, qty).expect("fits");
        }
        o
    }

    #[test]
    fn test_counts_each_order_once() {
        // Duplicate lines collapse inside Order, so A-B counts once for p1.
        let orders = vec![
            order("p1", &[("A", 10), ("B", 3), ("A", 2)]),
            order("p2", &[("A", 1)]),
        ];
        let cooc = CoOccurrence::from_orders(&orders);
        assert_eq!(cooc.get("A", "B"), 1);
        assert_eq!(cooc.len(), 1);
    }

    #[test]
    fn test_symmetric() {
        let orders = vec![
            order("p1", &[("A", 1), ("B", 1), ("C", 1)]),
            order("p2", &[("B", 1), ("C", 1)]),
        ];
        let cooc = CoOccurrence::from_orders(&orders);
        for (a, b) in [("A", "B"), ("A", "C"), ("B", "C")] {
            assert_eq!(cooc.get(a, b), cooc.get(b, a));
        }
        assert_eq!(cooc.get("B", "C"), 2);
        assert_eq!(cooc.get("A", "A"), 0);
    }

    #[test]
    fn test_totals() {
        let cooc = CoOccurrence::from_pairs([("A", "B", 2), ("A", "C", 1), ("B", "C", 4)]);
        assert_eq!(cooc.total_for("A"), 3);
        assert_eq!(cooc.total_for("B"), 6);
        assert_eq!(cooc.total_for("C"), 5);
        assert_eq!(cooc.total_for("Z"), 0);
        assert_eq!(cooc.max_total(), 6);
    }

    #[test]
    fn test_from_pairs_ignores_self_pairs() {
        let cooc = CoOccurrence::from_pairs([("A", "A", 5), ("B", "A", 1), ("A", "B", 1)]);
        assert_eq!(cooc.get("A", "B"), 2);
        assert_eq!(cooc.total_for("A"), 2);
        assert_eq!(cooc.len(), 1);
    }

    #[test]
    fn test_pairs_sorted() {
        let cooc = CoOccurrence::from_pairs([("i10", "i2", 1), ("i1", "i2", 3)]);
        assert_eq!(cooc.pairs(), vec![("i1", "i2", 3), ("i10", "i2", 1)]);
    }

    #[test]
    fn test_empty() {
        let cooc = CoOccurrence::new();
        assert!(cooc.is_empty());
        assert_eq!(cooc.max_total(), 0);
    }
}
