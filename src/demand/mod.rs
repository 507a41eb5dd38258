//! Demand and co-occurrence preprocessing.
//!
//! - [`group_orders`] — groups raw order lines into orders
//! - [`CoOccurrence`] — symmetric item-pair counts
//! - [`DemandPreprocessor`] — derives frequency, quantity, and required
//!   block counts per item

mod cooccurrence;
mod grouping;
mod profile;

pub use cooccurrence::CoOccurrence;
pub use grouping::group_orders;
pub use profile::{DemandAnalysis, DemandPreprocessor, DemandProfile, ItemDemand};
