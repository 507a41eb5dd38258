//! # u-slotting
//!
//! Warehouse slotting: assigns items to storage blocks so that order
//! picking walks less and moves heavy, frequently ordered stock the
//! shortest distance.
//!
//! ## Modules
//!
//! - [`models`] — Domain records (layout, items, orders, assignment)
//! - [`graph`] — Warehouse graph with memoised shortest-path distances
//! - [`demand`] — Order grouping, demand frequency, co-occurrence
//! - [`placement`] — Greedy PPS/LSC placement engine and baselines
//! - [`evaluation`] — Order-replay simulation and pick routes
//! - [`pipeline`] — End-to-end runs
//! - [`config`] — Algorithm and run configuration
//! - [`io`] — CSV/JSON inputs and result files

pub mod config;
pub mod demand;
pub mod error;
pub mod evaluation;
pub mod graph;
pub mod ids;
pub mod io;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod placement;
