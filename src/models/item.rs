//! Item master and inventory records.

use serde::{Deserialize, Serialize};

/// An item master record.
///
/// # Examples
///
/// ```
/// use u_slotting::models::ItemSpec;
///
/// let item = ItemSpec::new("A", 2.0, 1.5);
/// assert_eq!(item.units_per_block(60.0), 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    /// Item id.
    #[serde(rename = "ItemID", alias = "item_id")]
    pub id: String,
    /// Footprint consumed per unit.
    #[serde(rename = "Size", alias = "size")]
    pub size: f64,
    /// Handling multiplier per unit moved.
    #[serde(rename = "Weight", alias = "weight")]
    pub weight: f64,
}

impl ItemSpec {
    /// Creates an item master record.
    pub fn new(id: impl Into<String>, size: f64, weight: f64) -> Self {
        Self {
            id: id.into(),
            size,
            weight,
        }
    }

    /// Whole units of this item that fit in one block of the given capacity.
    pub fn units_per_block(&self, block_capacity: f64) -> u64 {
        units_per_block(self.size, block_capacity)
    }

    /// Blocks needed to store `quantity` units of this item.
    pub fn blocks_for(&self, quantity: u64, block_capacity: f64) -> Option<usize> {
        blocks_for(quantity, self.size, block_capacity)
    }
}

/// Whole units of size `size` that fit in one block: `floor(capacity / size)`.
///
/// Zero for a non-positive size or capacity.
pub fn units_per_block(size: f64, block_capacity: f64) -> u64 {
    if size <= 0.0 || block_capacity <= 0.0 {
        return 0;
    }
    (block_capacity / size).floor() as u64
}

/// Blocks needed to store `quantity` units: `ceil(quantity × size / capacity)`.
///
/// `None` if the capacity is not a positive finite number or the block
/// count does not fit in a `usize`.
///
/// ```
/// use u_slotting::models::blocks_for;
///
/// assert_eq!(blocks_for(24, 1.0, 10.0), Some(3));
/// assert_eq!(blocks_for(0, 1.0, 0.0), Some(0));
/// assert_eq!(blocks_for(1, 1.0, 0.0), None);
/// ```
pub fn blocks_for(quantity: u64, size: f64, block_capacity: f64) -> Option<usize> {
    if quantity == 0 {
        return Some(0);
    }
    if !block_capacity.is_finite() || block_capacity <= 0.0 {
        return None;
    }
    let blocks = (quantity as f64 * size / block_capacity).ceil();
    if blocks.is_finite() && blocks >= 0.0 && blocks < usize::MAX as f64 {
        Some(blocks as usize)
    } else {
        None
    }
}

/// An inventory override row: quantity of an item to store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryLine {
    /// Item id.
    #[serde(rename = "ItemID", alias = "item_id")]
    pub item_id: String,
    /// Units on hand.
    #[serde(rename = "Amount", alias = "amount")]
    pub amount: u64,
}

impl InventoryLine {
    /// Creates an inventory row.
    pub fn new(item_id: impl Into<String>, amount: u64) -> Self {
        Self {
            item_id: item_id.into(),
            amount,
        }
    }
}
