//! Order lines and grouped orders.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlottingError};
use crate::ids::natural_cmp;

/// A raw order line as recorded in the order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Customer placing the order.
    #[serde(rename = "CustomerID", alias = "customer_id")]
    pub customer_id: String,
    /// Item requested.
    #[serde(rename = "ItemID", alias = "item_id")]
    pub item_id: String,
    /// Units requested.
    #[serde(rename = "Amount", alias = "amount")]
    pub amount: u64,
    /// Order date, when the history distinguishes visits by day.
    #[serde(rename = "Date", alias = "date", default)]
    pub date: Option<String>,
}

impl OrderLine {
    /// Creates an undated order line.
    pub fn new(customer_id: impl Into<String>, item_id: impl Into<String>, amount: u64) -> Self {
        Self {
            customer_id: customer_id.into(),
            item_id: item_id.into(),
            amount,
            date: None,
        }
    }

    /// Sets the order date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

/// Key identifying one order: the customer, optionally split by date.
///
/// Keys order naturally by customer, then by date, so `p2` precedes `p10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderKey {
    /// Customer id.
    pub customer: String,
    /// Date component, if orders are grouped by customer and date.
    pub date: Option<String>,
}

impl OrderKey {
    /// Key for a customer-level order.
    pub fn customer(customer: impl Into<String>) -> Self {
        Self {
            customer: customer.into(),
            date: None,
        }
    }

    /// Key for a customer-and-date order.
    pub fn dated(customer: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            customer: customer.into(),
            date: Some(date.into()),
        }
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        natural_cmp(&self.customer, &other.customer).then_with(|| match (&self.date, &other.date) {
            (Some(a), Some(b)) => natural_cmp(a, b),
            (a, b) => a.cmp(b),
        })
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.date {
            Some(date) => write!(f, "{}@{}", self.customer, date),
            None => f.write_str(&self.customer),
        }
    }
}

/// One customer order: requested quantity per item.
///
/// Duplicate lines for the same item are summed.
///
/// # Examples
///
/// ```
/// use u_slotting::models::{Order, OrderKey};
///
/// let mut order = Order::new(OrderKey::customer("p1"));
/// order.add("A", 4).unwrap();
/// order.add("A", 6).unwrap();
/// order.add("B", 1).unwrap();
/// assert_eq!(order.quantity("A"), 10);
/// assert_eq!(order.num_items(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    key: OrderKey,
    lines: BTreeMap<String, u64>,
}

impl Order {
    /// Creates an empty order.
    pub fn new(key: OrderKey) -> Self {
        Self {
            key,
            lines: BTreeMap::new(),
        }
    }

    /// Adds `amount` units of `item` to the order.
    ///
    /// # Errors
    ///
    /// [`SlottingError::QuantityOverflow`] if the summed quantity of the
    /// item exceeds `u64::MAX`; the order is left unchanged.
    pub fn add(&mut self, item: impl Into<String>, amount: u64) -> Result<()> {
        let item = item.into();
        let current = self.quantity(&item);
        let total = current
            .checked_add(amount)
            .ok_or_else(|| SlottingError::QuantityOverflow { item: item.clone() })?;
        self.lines.insert(item, total);
        Ok(())
    }

    /// Order key.
    pub fn key(&self) -> &OrderKey {
        &self.key
    }

    /// Requested quantity for an item (0 if not requested).
    pub fn quantity(&self, item: &str) -> u64 {
        self.lines.get(item).copied().unwrap_or(0)
    }

    /// Item lines in ascending item id order.
    pub fn lines(&self) -> impl Iterator<Item = (&str, u64)> {
        self.lines.iter().map(|(item, &qty)| (item.as_str(), qty))
    }

    /// Distinct item ids in the order.
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.lines.keys().map(String::as_str)
    }

    /// Number of distinct items.
    pub fn num_items(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_key_natural_order() {
        let mut keys = vec![
            OrderKey::customer("p10"),
            OrderKey::customer("p2"),
            OrderKey::customer("p1"),
        ];
        keys.sort();
        let names: Vec<_> = keys.iter().map(|k| k.customer.as_str()).collect();
        assert_eq!(names, vec!["p1", "p2", "p10"]);
    }

    #[test]
    fn test_order_key_date_tiebreak() {
        let a = OrderKey::dated("p1", "2024-01-02");
        let b = OrderKey::dated("p1", "2024-01-10");
        assert!(a < b);
        assert!(OrderKey::customer("p1") < a);
    }

    #[test]
    fn test_order_key_display() {
        assert_eq!(OrderKey::customer("p1").to_string(), "p1");
        assert_eq!(OrderKey::dated("p1", "d1").to_string(), "p1@d1");
    }

    #[test]
    fn test_order_sums_duplicates() {
        let mut order = Order::new(OrderKey::customer("p1"));
        order.add("B", 3).expect("fits");
        order.add("A", 1).expect("fits");
        order.add("B", 2).expect("fits");
        assert_eq!(order.quantity("B"), 5);
        assert_eq!(order.quantity("Z"), 0);
        let lines: Vec<_> = order.lines().collect();
        assert_eq!(lines, vec![("A", 1), ("B", 5)]);
    }

    #[test]
    fn test_add_overflow_leaves_order_unchanged() {
        let mut order = Order::new(OrderKey::customer("p1"));
        order.add("A", u64::MAX - 1).expect("fits");
        let err = order.add("A", 2).expect_err("overflows");
        assert!(matches!(err, SlottingError::QuantityOverflow { ref item } if item == "A"));
        assert_eq!(order.quantity("A"), u64::MAX - 1);
    }
}
