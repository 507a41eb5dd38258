//! Pick-route construction over a warehouse graph.
//!
//! Routes are closed tours `depot → stops… → depot`. Stops are ordered with
//! nearest-neighbour and may be refined with first-improvement 2-opt:
//!
//! ```text
//! delta = d(prev_i, r[j]) + d(r[i], next_j) - d(prev_i, r[i]) - d(r[j], next_j)
//! ```
//!
//! If delta < 0, the segment `r[i..=j]` is reversed.

use crate::graph::{NodeId, WarehouseGraph};
use crate::ids::sort_natural_by;

/// Orders `stops` by repeatedly moving to the closest unvisited one,
/// starting from the depot.
///
/// Ties go to the stop whose id sorts first in natural order.
///
/// # Examples
///
/// ```
/// use u_slotting::evaluation::nearest_neighbor_route;
/// use u_slotting::graph::WarehouseGraph;
/// use u_slotting::models::Layout;
///
/// let g = WarehouseGraph::new(&Layout::two_branch()).unwrap();
/// let stops: Vec<_> = ["b7", "b2", "b1"].iter().map(|b| g.node_id(b).unwrap()).collect();
/// let route = nearest_neighbor_route(&g, &stops);
/// let names: Vec<_> = route.iter().map(|&n| g.name(n)).collect();
/// assert_eq!(names, ["b1", "b2", "b7"]);
/// ```
pub fn nearest_neighbor_route(graph: &WarehouseGraph, stops: &[NodeId]) -> Vec<NodeId> {
    let mut remaining: Vec<NodeId> = stops.to_vec();
    sort_natural_by(&mut remaining, |&n| graph.name(n));
    remaining.dedup();

    let mut route = Vec::with_capacity(remaining.len());
    let mut current = graph.depot_id();

    while !remaining.is_empty() {
        let mut best = 0;
        let mut best_dist = graph.distance_between(current, remaining[0]);
        for (pos, &stop) in remaining.iter().enumerate().skip(1) {
            let d = graph.distance_between(current, stop);
            if d < best_dist {
                best = pos;
                best_dist = d;
            }
        }
        current = remaining.remove(best);
        route.push(current);
    }
    route
}

/// Applies 2-opt to an ordered stop sequence (depot excluded).
///
/// Returns the improved sequence. The closed-tour length never increases.
pub fn two_opt_improve(graph: &WarehouseGraph, stops: &[NodeId]) -> Vec<NodeId> {
    let mut current = stops.to_vec();
    if current.len() < 3 {
        return current;
    }

    let depot = graph.depot_id();
    let n = current.len();
    let mut improved = true;
    while improved {
        improved = false;
        for i in 0..n - 1 {
            for j in i + 1..n {
                let prev_i = if i == 0 { depot } else { current[i - 1] };
                let next_j = if j == n - 1 { depot } else { current[j + 1] };
                let old = graph.distance_between(prev_i, current[i])
                    + graph.distance_between(current[j], next_j);
                let new = graph.distance_between(prev_i, current[j])
                    + graph.distance_between(current[i], next_j);
                if new - old < -1e-10 {
                    current[i..=j].reverse();
                    improved = true;
                }
            }
        }
    }
    current
}

/// Length of `depot → stops… → depot`. Zero for no stops.
pub fn tour_length(graph: &WarehouseGraph, stops: &[NodeId]) -> f64 {
    let depot = graph.depot_id();
    let mut prev = depot;
    let mut total = 0.0;
    for &stop in stops {
        total += graph.distance_between(prev, stop);
        prev = stop;
    }
    total + graph.distance_between(prev, depot)
}
