//! Location Suitability Cost.
//!
//! ```text
//! LSC(i, b) = w_depot · d(depot, b) · weight_i / k_i
//!           + w_affinity · Σ_j Σ_{b_j ∈ blocks(j)} cooc(i, j) · d(b, b_j)
//! ```
//!
//! Dividing the depot term by `k_i` amortises the walk over the blocks the
//! item still needs. An item with `k_i = 0` has infinite cost.

use crate::config::LocationWeights;
use crate::graph::{NodeId, WarehouseGraph};

/// Blocks already held by one placed item, with its co-occurrence to the
/// item being placed.
#[derive(Debug, Clone, Copy)]
pub struct Neighbour<'a> {
    /// `cooc(i, j)` as a float.
    pub cooccurrence: f64,
    /// Blocks assigned to `j`.
    pub blocks: &'a [NodeId],
}

/// Scores candidate blocks for "where to place it".
#[derive(Debug, Clone, Copy)]
pub struct LocationCost<'g> {
    graph: &'g WarehouseGraph,
    weights: LocationWeights,
}

impl<'g> LocationCost<'g> {
    /// Creates a cost function over `graph`.
    pub fn new(graph: &'g WarehouseGraph, weights: LocationWeights) -> Self {
        Self { graph, weights }
    }

    /// Depot term for a block.
    pub fn depot_term(&self, block: NodeId, item_weight: f64, required_blocks: usize) -> f64 {
        if required_blocks == 0 {
            return f64::INFINITY;
        }
        self.weights.w_depot * self.graph.depot_distance(block) * item_weight
            / required_blocks as f64
    }

    /// Affinity term for a block.
    pub fn affinity_term(&self, block: NodeId, neighbours: &[Neighbour<'_>]) -> f64 {
        let sum: f64 = neighbours
            .iter()
            .map(|n| {
                n.blocks
                    .iter()
                    .map(|&other| n.cooccurrence * self.graph.distance_between(block, other))
                    .sum::<f64>()
            })
            .sum();
        self.weights.w_affinity * sum
    }

    /// Full LSC of placing an item with `item_weight` and `required_blocks`
    /// at `block`.
    pub fn cost(
        &self,
        block: NodeId,
        item_weight: f64,
        required_blocks: usize,
        neighbours: &[Neighbour<'_>],
    ) -> f64 {
        self.depot_term(block, item_weight, required_blocks) + self.affinity_term(block, neighbours)
    }
}
