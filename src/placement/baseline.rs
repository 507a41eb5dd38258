//! Reference placements to compare the greedy engine against.
//!
//! - [`static_priority_assignment`] ranks items once by a static PPS and
//!   fills blocks nearest-to-depot first.
//! - [`random_assignment`] shuffles blocks with a seeded RNG.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::PriorityWeights;
use crate::demand::{CoOccurrence, DemandProfile, ItemDemand};
use crate::error::Result;
use crate::graph::{NodeId, WarehouseGraph};
use crate::ids::natural_cmp;

use super::engine::{Placement, PlacementStep};
use super::priority::PriorityScorer;

/// Static-priority placement.
///
/// Every item is scored once, using its total co-occurrence as the affinity
/// sum. Items in descending score take blocks in ascending depot distance.
///
/// # Errors
///
/// [`crate::error::SlottingError::BlockExhaustion`] if the graph has too few
/// blocks.
pub fn static_priority_assignment(
    graph: &WarehouseGraph,
    profile: &DemandProfile,
    cooc: &CoOccurrence,
    weights: PriorityWeights,
) -> Result<Placement> {
    let items: Vec<&ItemDemand> = profile.placeable().collect();
    let scorer = PriorityScorer::new(&items, cooc.max_total(), weights);

    let mut ranked: Vec<(usize, f64)> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| (idx, scorer.score(idx, f64::from(cooc.total_for(&item.id)))))
        .collect();
    // stable sort keeps natural item order on ties
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut blocks: Vec<NodeId> = graph.block_ids().to_vec();
    blocks.sort_by(|&a, &b| {
        graph
            .depot_distance(a)
            .total_cmp(&graph.depot_distance(b))
            .then_with(|| natural_cmp(graph.name(a), graph.name(b)))
    });

    fill(graph, &items, ranked, &blocks, |block| graph.depot_distance(block))
}

/// Random placement driven by `seed`.
///
/// Items in natural order take their blocks from a shuffled block list. The
/// same seed always yields the same placement.
///
/// # Errors
///
/// [`crate::error::SlottingError::BlockExhaustion`] if the graph has too few
/// blocks.
pub fn random_assignment(
    graph: &WarehouseGraph,
    profile: &DemandProfile,
    seed: u64,
) -> Result<Placement> {
    let items: Vec<&ItemDemand> = profile.placeable().collect();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut blocks: Vec<NodeId> = graph.block_ids().to_vec();
    blocks.shuffle(&mut rng);

    let order = (0..items.len()).map(|idx| (idx, 0.0)).collect();
    fill(graph, &items, order, &blocks, |_| 0.0)
}

fn fill(
    graph: &WarehouseGraph,
    items: &[&ItemDemand],
    order: Vec<(usize, f64)>,
    blocks: &[NodeId],
    cost: impl Fn(NodeId) -> f64,
) -> Result<Placement> {
    let required = items
        .iter()
        .fold(0usize, |acc, i| acc.saturating_add(i.required_blocks));
    let mut placement = Placement::new(required);
    let mut free = blocks.iter();

    for (idx, priority) in order {
        let item = items[idx];
        for _ in 0..item.required_blocks {
            let Some(&block) = free.next() else {
                return Err(placement.exhausted());
            };
            placement.record(PlacementStep {
                item: item.id.clone(),
                block: graph.name(block).to_string(),
                priority,
                cost: cost(block),
            });
        }
    }
    Ok(placement)
}
