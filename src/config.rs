//! Run configuration.
//!
//! [`SlottingConfig`] carries the algorithm parameters consumed by the
//! preprocessing, placement, and evaluation components. [`RunConfig`] wraps
//! it with the input and output locations used by the `u-slotting` binary.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlottingError};

/// Weights of the Placement Priority Score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    /// Weight of the normalised demand-frequency × item-weight term.
    pub w_freq: f64,
    /// Weight of the normalised affinity-to-placed-items term.
    pub w_cooc: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            w_freq: 0.5,
            w_cooc: 0.5,
        }
    }
}

impl PriorityWeights {
    /// Creates a weight pair.
    pub fn new(w_freq: f64, w_cooc: f64) -> Self {
        Self { w_freq, w_cooc }
    }
}

/// Weights of the Location Suitability Cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationWeights {
    /// Weight of the depot-distance term.
    pub w_depot: f64,
    /// Weight of the distance-to-co-ordered-items term.
    pub w_affinity: f64,
}

impl Default for LocationWeights {
    fn default() -> Self {
        Self {
            w_depot: 0.5,
            w_affinity: 0.5,
        }
    }
}

impl LocationWeights {
    /// Creates a weight pair.
    pub fn new(w_depot: f64, w_affinity: f64) -> Self {
        Self {
            w_depot,
            w_affinity,
        }
    }
}

/// How raw order lines are grouped into orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderGrouping {
    /// One order per customer.
    #[default]
    Customer,
    /// One order per customer and date.
    CustomerDate,
}

/// What to do with items that have no item master record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingItemPolicy {
    /// Fail with [`SlottingError::MissingItemMaster`].
    #[default]
    Reject,
    /// Treat the item as size 1, weight 1 and log a warning.
    UnitDefaults,
}

/// Pick-route construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Refine nearest-neighbour routes with 2-opt.
    pub two_opt: bool,
}

/// Algorithm parameters for one slotting run.
///
/// # Examples
///
/// ```
/// use u_slotting::config::SlottingConfig;
///
/// let config: SlottingConfig =
///     serde_json::from_str(r#"{ "block_capacity": 10, "priority": { "w_freq": 0.7, "w_cooc": 0.3 } }"#)
///         .unwrap();
/// assert_eq!(config.block_capacity, 10.0);
/// assert_eq!(config.priority.w_cooc, 0.3);
/// assert_eq!(config.location.w_depot, 0.5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlottingConfig {
    /// Footprint units one block holds.
    pub block_capacity: f64,
    /// PPS weights.
    pub priority: PriorityWeights,
    /// LSC weights.
    pub location: LocationWeights,
    /// Order grouping key.
    pub grouping: OrderGrouping,
    /// Policy for items missing from the item master.
    pub missing_items: MissingItemPolicy,
    /// Route construction options.
    pub route: RouteConfig,
}

impl Default for SlottingConfig {
    fn default() -> Self {
        Self {
            block_capacity: 60.0,
            priority: PriorityWeights::default(),
            location: LocationWeights::default(),
            grouping: OrderGrouping::default(),
            missing_items: MissingItemPolicy::default(),
            route: RouteConfig::default(),
        }
    }
}

impl SlottingConfig {
    /// Sets the block capacity.
    pub fn with_block_capacity(mut self, capacity: f64) -> Self {
        self.block_capacity = capacity;
        self
    }

    /// Sets the PPS weights.
    pub fn with_priority(mut self, weights: PriorityWeights) -> Self {
        self.priority = weights;
        self
    }

    /// Sets the LSC weights.
    pub fn with_location(mut self, weights: LocationWeights) -> Self {
        self.location = weights;
        self
    }

    /// Sets the order grouping.
    pub fn with_grouping(mut self, grouping: OrderGrouping) -> Self {
        self.grouping = grouping;
        self
    }

    /// Sets the missing-item policy.
    pub fn with_missing_items(mut self, policy: MissingItemPolicy) -> Self {
        self.missing_items = policy;
        self
    }

    /// Enables or disables 2-opt route refinement.
    pub fn with_two_opt(mut self, enabled: bool) -> Self {
        self.route.two_opt = enabled;
        self
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`SlottingError::InvalidConfig`] if the capacity is not a positive
    /// finite number, a PPS weight lies outside `[0, 1]`, or an LSC weight
    /// is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        if !self.block_capacity.is_finite() || self.block_capacity <= 0.0 {
            return Err(SlottingError::InvalidConfig(format!(
                "block_capacity must be positive, got {}",
                self.block_capacity
            )));
        }
        for (name, w) in [
            ("w_freq", self.priority.w_freq),
            ("w_cooc", self.priority.w_cooc),
        ] {
            if !(0.0..=1.0).contains(&w) {
                return Err(SlottingError::InvalidConfig(format!(
                    "{name} must lie in [0, 1], got {w}"
                )));
            }
        }
        for (name, w) in [
            ("w_depot", self.location.w_depot),
            ("w_affinity", self.location.w_affinity),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(SlottingError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {w}"
                )));
            }
        }
        Ok(())
    }
}

/// Where the warehouse topology comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutSource {
    /// The built-in two-branch warehouse.
    #[default]
    TwoBranch,
    /// A JSON file with `nodes` and `edges` arrays.
    File(PathBuf),
}

/// Input files for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputPaths {
    /// Order history CSV.
    pub orders: PathBuf,
    /// Item master CSV.
    pub items: PathBuf,
    /// Optional inventory override CSV.
    #[serde(default)]
    pub inventory: Option<PathBuf>,
    /// Warehouse topology.
    #[serde(default)]
    pub layout: LayoutSource,
}

/// Complete configuration of a `u-slotting` invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Algorithm parameters.
    #[serde(default)]
    pub slotting: SlottingConfig,
    /// Input files.
    pub inputs: InputPaths,
    /// Directory receiving the result files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Seed for the random-placement baseline; omitted means no baselines.
    #[serde(default)]
    pub baseline_seed: Option<u64>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

impl RunConfig {
    /// Loads and validates a JSON run configuration.
    ///
    /// Relative input and output paths are resolved against the directory
    /// containing the configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut config: RunConfig = serde_json::from_str(&text)?;
        config.slotting.validate()?;

        if let Some(base) = path.parent() {
            config.resolve_against(base);
        }
        Ok(config)
    }

    fn resolve_against(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        join(&mut self.inputs.orders);
        join(&mut self.inputs.items);
        if let Some(inv) = self.inputs.inventory.as_mut() {
            join(inv);
        }
        if let LayoutSource::File(layout) = &mut self.inputs.layout {
            join(layout);
        }
        join(&mut self.output_dir);
    }
}
