//! Per-item demand signals and the preprocessor that derives them.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::config::{MissingItemPolicy, OrderGrouping, SlottingConfig};
use crate::error::{Result, SlottingError};
use crate::ids::natural_cmp;
use crate::models::{blocks_for, InventoryLine, ItemSpec, Order, OrderLine};

use super::cooccurrence::CoOccurrence;
use super::grouping::group_orders;

/// Demand signals for one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDemand {
    /// Item id.
    pub id: String,
    /// Footprint per unit.
    pub size: f64,
    /// Handling multiplier per unit.
    pub weight: f64,
    /// Number of distinct orders containing the item.
    pub frequency: u32,
    /// Units to store.
    pub total_quantity: u64,
    /// Blocks the item needs.
    pub required_blocks: usize,
}

impl ItemDemand {
    /// Creates a demand record with explicit values.
    pub fn new(
        id: impl Into<String>,
        size: f64,
        weight: f64,
        frequency: u32,
        total_quantity: u64,
        required_blocks: usize,
    ) -> Self {
        Self {
            id: id.into(),
            size,
            weight,
            frequency,
            total_quantity,
            required_blocks,
        }
    }

    /// Demand frequency scaled by item weight.
    pub fn freq_weight(&self) -> f64 {
        f64::from(self.frequency) * self.weight
    }
}

/// Demand records for every known item, in natural id order.
///
/// # Examples
///
/// ```
/// use u_slotting::demand::{DemandProfile, ItemDemand};
///
/// let profile = DemandProfile::new(
///     60.0,
///     vec![
///         ItemDemand::new("B", 1.0, 8.0, 1, 10, 1),
///         ItemDemand::new("A", 1.0, 2.0, 5, 90, 2),
///         ItemDemand::new("C", 1.0, 1.0, 0, 0, 0),
///     ],
/// );
/// assert_eq!(profile.len(), 3);
/// assert_eq!(profile.total_required_blocks(), 3);
/// assert_eq!(profile.placeable().count(), 2);
/// assert_eq!(profile.get("A").unwrap().frequency, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandProfile {
    block_capacity: f64,
    items: Vec<ItemDemand>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl DemandProfile {
    /// Builds a profile from explicit records.
    pub fn new(block_capacity: f64, mut items: Vec<ItemDemand>) -> Self {
        items.sort_by(|a, b| natural_cmp(&a.id, &b.id));
        let index = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id.clone(), i))
            .collect();
        Self {
            block_capacity,
            items,
            index,
        }
    }

    /// Block capacity the required counts were computed for.
    pub fn block_capacity(&self) -> f64 {
        self.block_capacity
    }

    /// Record for an item, if known.
    pub fn get(&self, id: &str) -> Option<&ItemDemand> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    /// All records in natural id order.
    pub fn items(&self) -> &[ItemDemand] {
        &self.items
    }

    /// Records with at least one required block.
    pub fn placeable(&self) -> impl Iterator<Item = &ItemDemand> {
        self.items.iter().filter(|i| i.required_blocks > 0)
    }

    /// Sum of required blocks over all items, saturating at `usize::MAX`.
    pub fn total_required_blocks(&self) -> usize {
        self.items
            .iter()
            .fold(0usize, |acc, i| acc.saturating_add(i.required_blocks))
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the profile has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Output of [`DemandPreprocessor::analyze`].
#[derive(Debug, Clone)]
pub struct DemandAnalysis {
    /// Per-item demand signals.
    pub profile: DemandProfile,
    /// Item-pair co-occurrence.
    pub cooccurrence: CoOccurrence,
    /// Orders in replay order.
    pub orders: Vec<Order>,
}

/// Turns order history and the item master into demand signals.
#[derive(Debug, Clone)]
pub struct DemandPreprocessor {
    block_capacity: f64,
    grouping: OrderGrouping,
    missing_items: MissingItemPolicy,
}

impl DemandPreprocessor {
    /// Creates a preprocessor from the run configuration.
    ///
    /// # Errors
    ///
    /// [`SlottingError::InvalidConfig`] when `config` fails validation.
    pub fn new(config: &SlottingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            block_capacity: config.block_capacity,
            grouping: config.grouping,
            missing_items: config.missing_items,
        })
    }

    /// Derives the demand profile, co-occurrence table, and grouped orders.
    ///
    /// When `inventory` is given it is authoritative for quantities: items
    /// it does not list store nothing. Demand frequency always comes from
    /// the order history.
    ///
    /// # Errors
    ///
    /// - [`SlottingError::InvalidItem`] for duplicate item master rows or
    ///   rows with a non-positive size or negative weight
    /// - [`SlottingError::MissingItemMaster`] for items referenced by orders
    ///   or inventory without an item master row, under
    ///   [`MissingItemPolicy::Reject`]
    /// - [`SlottingError::QuantityOverflow`] when an item's summed quantity
    ///   or block count does not fit the integer range
    pub fn analyze(
        &self,
        lines: &[OrderLine],
        item_master: &[ItemSpec],
        inventory: Option<&[InventoryLine]>,
    ) -> Result<DemandAnalysis> {
        let master = index_item_master(item_master)?;
        let orders = group_orders(lines, self.grouping)?;

        let mut frequency: HashMap<&str, u32> = HashMap::new();
        let mut ordered_qty: HashMap<&str, u64> = HashMap::new();
        for order in &orders {
            for (item, qty) in order.lines() {
                let f = frequency.entry(item).or_insert(0);
                *f = f.saturating_add(1);
                accumulate(&mut ordered_qty, item, qty)?;
            }
        }

        let quantities = match inventory {
            Some(rows) => {
                let mut stock: HashMap<&str, u64> = HashMap::new();
                for row in rows {
                    accumulate(&mut stock, &row.item_id, row.amount)?;
                }
                stock
            }
            None => ordered_qty,
        };

        let mut universe: BTreeSet<&str> = BTreeSet::new();
        universe.extend(frequency.keys().copied());
        universe.extend(quantities.keys().copied());
        universe.extend(master.keys().copied());

        let mut items = Vec::with_capacity(universe.len());
        for &id in &universe {
            let (size, weight) = match master.get(id) {
                Some(spec) => (spec.size, spec.weight),
                None => match self.missing_items {
                    MissingItemPolicy::Reject => {
                        return Err(SlottingError::MissingItemMaster {
                            item: id.to_string(),
                        })
                    }
                    MissingItemPolicy::UnitDefaults => {
                        tracing::warn!(item = id, "no item master record; using size 1, weight 1");
                        (1.0, 1.0)
                    }
                },
            };
            let total_quantity = quantities.get(id).copied().unwrap_or(0);
            let required_blocks = blocks_for(total_quantity, size, self.block_capacity)
                .ok_or_else(|| SlottingError::QuantityOverflow {
                    item: id.to_string(),
                })?;
            items.push(ItemDemand {
                id: id.to_string(),
                size,
                weight,
                frequency: frequency.get(id).copied().unwrap_or(0),
                total_quantity,
                required_blocks,
            });
        }

        if inventory.is_some() {
            for (item, f) in &frequency {
                if quantities.get(item).copied().unwrap_or(0) == 0 {
                    tracing::warn!(item = *item, orders = *f, "ordered item has no inventory");
                }
            }
        }

        let profile = DemandProfile::new(self.block_capacity, items);
        let cooccurrence = CoOccurrence::from_orders(&orders);

        tracing::info!(
            orders = orders.len(),
            items = profile.len(),
            required_blocks = profile.total_required_blocks(),
            pairs = cooccurrence.len(),
            "demand preprocessed"
        );

        Ok(DemandAnalysis {
            profile,
            cooccurrence,
            orders,
        })
    }
}

fn accumulate<'a>(totals: &mut HashMap<&'a str, u64>, item: &'a str, amount: u64) -> Result<()> {
    let total = totals.entry(item).or_insert(0);
    *total = total
        .checked_add(amount)
        .ok_or_else(|| SlottingError::QuantityOverflow {
            item: item.to_string(),
        })?;
    Ok(())
}

fn index_item_master(item_master: &[ItemSpec]) -> Result<HashMap<&str, &ItemSpec>> {
    let mut master = HashMap::with_capacity(item_master.len());
    for spec in item_master {
        if !spec.size.is_finite() || spec.size <= 0.0 {
            return Err(invalid(spec, format!("size must be positive, got {}", spec.size)));
        }
        if !spec.weight.is_finite() || spec.weight < 0.0 {
            return Err(invalid(
                spec,
                format!("weight must be non-negative, got {}", spec.weight),
            ));
        }
        if master.insert(spec.id.as_str(), spec).is_some() {
            return Err(invalid(spec, "duplicate item master record".to_string()));
        }
    }
    Ok(master)
}

fn invalid(spec: &ItemSpec, reason: String) -> SlottingError {
    SlottingError::InvalidItem {
        item: spec.id.clone(),
        reason,
    }
}
