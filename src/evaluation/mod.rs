//! Order-replay evaluation of a block assignment.
//!
//! - [`Evaluator`] — replays orders against finite per-block stock and
//!   aggregates travel distance and handling effort
//! - [`nearest_neighbor_route`], [`two_opt_improve`] — pick-route construction

mod route;
mod simulator;

pub use route::{nearest_neighbor_route, tour_length, two_opt_improve};
pub use simulator::{EvaluationReport, Evaluator, OrderMetrics};
