//! Item-to-block placement.
//!
//! - [`PlacementEngine`] — greedy loop alternating "what to place" (PPS) and
//!   "where to place it" (LSC)
//! - [`PriorityScorer`] — Placement Priority Score
//! - [`LocationCost`] — Location Suitability Cost
//! - [`static_priority_assignment`], [`random_assignment`] — baselines

mod baseline;
mod engine;
mod location;
mod priority;

pub use baseline::{random_assignment, static_priority_assignment};
pub use engine::{Placement, PlacementEngine, PlacementStep};
pub use location::{LocationCost, Neighbour};
pub use priority::PriorityScorer;
