//! Grouping of raw order lines into orders.

use std::collections::BTreeMap;

use crate::config::OrderGrouping;
use crate::error::Result;
use crate::models::{Order, OrderKey, OrderLine};

/// Groups order lines into orders keyed by customer (and date, if asked).
///
/// Duplicate item lines within an order are summed. Orders come back in
/// natural key order so that replays are reproducible regardless of input
/// row order. Lines without a date fall into an undated order for their
/// customer when grouping by date.
///
/// # Errors
///
/// [`crate::error::SlottingError::QuantityOverflow`] if an item's summed
/// quantity within one order exceeds `u64::MAX`.
///
/// # Examples
///
/// ```
/// use u_slotting::config::OrderGrouping;
/// use u_slotting::demand::group_orders;
/// use u_slotting::models::OrderLine;
///
/// let lines = vec![
///     OrderLine::new("p10", "A", 1),
///     OrderLine::new("p2", "B", 2),
///     OrderLine::new("p2", "B", 3),
/// ];
/// let orders = group_orders(&lines, OrderGrouping::Customer).unwrap();
/// assert_eq!(orders.len(), 2);
/// assert_eq!(orders[0].key().customer, "p2");
/// assert_eq!(orders[0].quantity("B"), 5);
/// ```
pub fn group_orders(lines: &[OrderLine], grouping: OrderGrouping) -> Result<Vec<Order>> {
    let mut orders: BTreeMap<OrderKey, Order> = BTreeMap::new();

    for line in lines {
        let key = match (grouping, &line.date) {
            (OrderGrouping::CustomerDate, Some(date)) => {
                OrderKey::dated(line.customer_id.clone(), date.clone())
            }
            _ => OrderKey::customer(line.customer_id.clone()),
        };
        orders
            .entry(key.clone())
            .or_insert_with(|| Order::new(key))
            .add(line.item_id.clone(), line.amount)?;
    }

    Ok(orders.into_values().collect())
}
