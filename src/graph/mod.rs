//! Warehouse graph and distance oracle.
//!
//! Provides an undirected weighted graph of depot, junction, and block
//! nodes with memoised shortest-path distances.

mod warehouse;

pub use warehouse::{NodeId, WarehouseGraph};
