//! Greedy PPS + LSC placement loop.
//!
//! # Algorithm
//!
//! While some item still needs blocks:
//!
//! 1. Score every unfinished item with the Placement Priority Score and
//!    pick the maximum (ties: smallest item id in natural order).
//! 2. Score every free block with the Location Suitability Cost for that
//!    item and pick the minimum (ties: smallest block id in natural order).
//! 3. Assign the block, and if this is the item's first block, add its
//!    co-occurrence to every other item's affinity sum.
//!
//! Both scores are recomputed each iteration because every placement
//! changes the affinity landscape.
//!
//! # Complexity
//!
//! O(B · (I + B · P)) where B = blocks placed, I = items, P = blocks held by
//! co-occurring placed items.

use serde::Serialize;

use crate::config::{LocationWeights, PriorityWeights, SlottingConfig};
use crate::demand::{CoOccurrence, DemandProfile, ItemDemand};
use crate::error::{Result, SlottingError};
use crate::graph::{NodeId, WarehouseGraph};
use crate::models::Assignment;

use super::location::{LocationCost, Neighbour};
use super::priority::PriorityScorer;

/// One assignment made by a placement strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementStep {
    /// Item placed.
    pub item: String,
    /// Block it received.
    pub block: String,
    /// Priority the item had when chosen.
    pub priority: f64,
    /// Cost of the chosen block.
    pub cost: f64,
}

/// Result of a placement strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    /// Block-to-item mapping.
    pub assignment: Assignment,
    /// Assignments in the order they were made.
    pub steps: Vec<PlacementStep>,
    /// Blocks the profile asked for.
    pub required_blocks: usize,
}

impl Placement {
    pub(crate) fn new(required_blocks: usize) -> Self {
        Self {
            assignment: Assignment::new(),
            steps: Vec::new(),
            required_blocks,
        }
    }

    pub(crate) fn record(&mut self, step: PlacementStep) {
        let fresh = self.assignment.assign(step.block.clone(), step.item.clone());
        debug_assert!(fresh, "block {} assigned twice", step.block);
        self.steps.push(step);
    }

    pub(crate) fn exhausted(self) -> SlottingError {
        tracing::warn!(
            required = self.required_blocks,
            placed = self.assignment.len(),
            "ran out of blocks before all items were placed"
        );
        SlottingError::BlockExhaustion {
            required: self.required_blocks,
            placed: self.assignment.len(),
            partial: Box::new(self),
        }
    }

    /// Returns `true` if every required block was assigned.
    pub fn is_complete(&self) -> bool {
        self.assignment.len() == self.required_blocks
    }
}

/// Greedy item-to-block placement driven by PPS and LSC.
///
/// # Examples
///
/// ```
/// use u_slotting::config::SlottingConfig;
/// use u_slotting::demand::{CoOccurrence, DemandProfile, ItemDemand};
/// use u_slotting::graph::WarehouseGraph;
/// use u_slotting::models::Layout;
/// use u_slotting::placement::PlacementEngine;
///
/// let graph = WarehouseGraph::new(&Layout::two_branch()).unwrap();
/// let profile = DemandProfile::new(
///     60.0,
///     vec![
///         ItemDemand::new("A", 1.0, 2.0, 5, 120, 2),
///         ItemDemand::new("B", 1.0, 8.0, 1, 60, 1),
///     ],
/// );
/// let engine = PlacementEngine::new(&graph, &SlottingConfig::default()).unwrap();
/// let placement = engine.place(&profile, &CoOccurrence::new()).unwrap();
///
/// assert_eq!(placement.assignment.len(), 3);
/// assert_eq!(placement.assignment.blocks_of("A").len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PlacementEngine<'g> {
    graph: &'g WarehouseGraph,
    priority: PriorityWeights,
    location: LocationWeights,
}

impl<'g> PlacementEngine<'g> {
    /// Creates an engine over `graph` with the configured weights.
    ///
    /// # Errors
    ///
    /// [`SlottingError::InvalidConfig`] when `config` fails validation.
    pub fn new(graph: &'g WarehouseGraph, config: &SlottingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            graph,
            priority: config.priority,
            location: config.location,
        })
    }

    /// Assigns every placeable item its required number of blocks.
    ///
    /// # Errors
    ///
    /// [`SlottingError::BlockExhaustion`] if free blocks run out first; the
    /// error carries the partial placement.
    pub fn place(&self, profile: &DemandProfile, cooc: &CoOccurrence) -> Result<Placement> {
        let items: Vec<&ItemDemand> = profile.placeable().collect();
        let n = items.len();
        let required = items
            .iter()
            .fold(0usize, |acc, i| acc.saturating_add(i.required_blocks));

        let affinity_matrix: Vec<Vec<f64>> = items
            .iter()
            .map(|a| {
                items
                    .iter()
                    .map(|b| f64::from(cooc.get(&a.id, &b.id)))
                    .collect()
            })
            .collect();

        let scorer = PriorityScorer::new(&items, cooc.max_total(), self.priority);
        let lsc = LocationCost::new(self.graph, self.location);

        let mut placement = Placement::new(required);
        let mut available: Vec<NodeId> = self.graph.block_ids().to_vec();
        let mut held: Vec<Vec<NodeId>> = vec![Vec::new(); n];
        let mut affinity = vec![0.0; n];
        let mut placed_items: Vec<usize> = Vec::new();

        tracing::info!(
            items = n,
            required_blocks = required,
            blocks = available.len(),
            "placement started"
        );

        while placement.assignment.len() < required {
            if available.is_empty() {
                return Err(placement.exhausted());
            }

            let mut chosen: Option<(usize, f64)> = None;
            for (idx, item) in items.iter().enumerate() {
                if held[idx].len() >= item.required_blocks {
                    continue;
                }
                let score = scorer.score(idx, affinity[idx]);
                if chosen.map_or(true, |(_, best)| score > best) {
                    chosen = Some((idx, score));
                }
            }
            let Some((idx, priority)) = chosen else {
                break;
            };
            let item = items[idx];

            let neighbours: Vec<Neighbour<'_>> = placed_items
                .iter()
                .filter(|&&j| affinity_matrix[idx][j] > 0.0)
                .map(|&j| Neighbour {
                    cooccurrence: affinity_matrix[idx][j],
                    blocks: &held[j],
                })
                .collect();

            let mut best: Option<(usize, f64)> = None;
            for (pos, &block) in available.iter().enumerate() {
                let cost = lsc.cost(block, item.weight, item.required_blocks, &neighbours);
                if best.map_or(true, |(_, c)| cost < c) {
                    best = Some((pos, cost));
                }
            }
            // available is non-empty, so a block was chosen
            let Some((pos, cost)) = best else {
                return Err(placement.exhausted());
            };

            let block = available.remove(pos);
            if held[idx].is_empty() {
                placed_items.push(idx);
                for (j, row) in affinity_matrix.iter().enumerate() {
                    affinity[j] += row[idx];
                }
            }
            held[idx].push(block);

            tracing::debug!(
                item = %item.id,
                block = self.graph.name(block),
                priority,
                cost,
                "placed"
            );
            placement.record(PlacementStep {
                item: item.id.clone(),
                block: self.graph.name(block).to_string(),
                priority,
                cost,
            });
        }

        tracing::info!(
            placed = placement.assignment.len(),
            free = available.len(),
            "placement finished"
        );
        Ok(placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Layout, NodeRole};

    /// depot with three blocks at distances 1, 2, 3 on a line.
    fn three_block_graph() -> WarehouseGraph {
        let layout = Layout::new()
            .with_node("depot", NodeRole::Depot)
            .with_node("b1", NodeRole::Block)
            .with_node("b2", NodeRole::Block)
            .with_node("b3", NodeRole::Block)
            .with_edge("depot", "b1", 1.0)
            .with_edge("b1", "b2", 1.0)
            .with_edge("b2", "b3", 1.0);
        WarehouseGraph::new(&layout).expect("valid layout")
    }

    fn ab_profile() -> DemandProfile {
        DemandProfile::new(
            10.0,
            vec![
                ItemDemand::new("A", 1.0, 2.0, 5, 20, 2),
                ItemDemand::new("B", 1.0, 8.0, 1, 10, 1),
            ],
        )
    }

    #[test]
    fn test_high_demand_item_gets_nearest_blocks() {
        let g = three_block_graph();
        let engine = PlacementEngine::new(&g, &SlottingConfig::default()).expect("valid config");
        let placement = engine.place(&ab_profile(), &CoOccurrence::new()).expect("fits");

        assert_eq!(placement.assignment.blocks_of("A"), &["b1", "b2"]);
        assert_eq!(placement.assignment.blocks_of("B"), &["b3"]);
        assert_eq!(placement.steps[0].item, "A");
        assert_eq!(placement.steps[1].item, "A");
        assert_eq!(placement.steps[2].item, "B");
        assert!(placement.is_complete());
    }

    #[test]
    fn test_block_exhaustion_reports_partial() {
        let g = three_block_graph();
        let profile = DemandProfile::new(
            10.0,
            vec![
                ItemDemand::new("A", 1.0, 1.0, 3, 30, 3),
                ItemDemand::new("B", 1.0, 1.0, 1, 10, 1),
            ],
        );
        let engine = PlacementEngine::new(&g, &SlottingConfig::default()).expect("valid config");
        match engine.place(&profile, &CoOccurrence::new()) {
            Err(SlottingError::BlockExhaustion {
                required,
                placed,
                partial,
            }) => {
                assert_eq!(required, 4);
                assert_eq!(placed, 3);
                assert_eq!(partial.assignment.blocks_of("A").len(), 3);
                assert!(!partial.is_complete());
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn test_oversized_requirement_exhausts_without_overflow() {
        let g = three_block_graph();
        let profile = DemandProfile::new(
            10.0,
            vec![
                ItemDemand::new("A", 1.0, 1.0, 3, 30, usize::MAX),
                ItemDemand::new("B", 1.0, 1.0, 1, 10, 1),
            ],
        );
        let engine = PlacementEngine::new(&g, &SlottingConfig::default()).expect("valid config");
        match engine.place(&profile, &CoOccurrence::new()) {
            Err(SlottingError::BlockExhaustion {
                required, placed, ..
            }) => {
                assert_eq!(required, usize::MAX);
                assert_eq!(placed, 3);
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "assigned twice")]
    fn test_record_rejects_reused_block() {
        let step = |item: &str| PlacementStep {
            item: item.to_string(),
            block: "b1".to_string(),
            priority: 1.0,
            cost: 1.0,
        };
        let mut placement = Placement::new(2);
        placement.record(step("A"));
        placement.record(step("B"));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let g = three_block_graph();
        let config = SlottingConfig::default().with_block_capacity(0.0);
        assert!(matches!(
            PlacementEngine::new(&g, &config),
            Err(SlottingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_affinity_pulls_partner_closer() {
        let g = WarehouseGraph::new(&Layout::two_branch()).expect("valid layout");
        // A is the anchor, B co-occurs with A, C is unrelated but heavier.
        let profile = DemandProfile::new(
            60.0,
            vec![
                ItemDemand::new("A", 1.0, 1.0, 10, 60, 1),
                ItemDemand::new("B", 1.0, 1.0, 3, 60, 1),
                ItemDemand::new("C", 1.0, 1.0, 4, 60, 1),
            ],
        );
        let cooc = CoOccurrence::from_pairs([("A", "B", 3)]);
        let engine = PlacementEngine::new(&g, &SlottingConfig::default()).expect("valid config");
        let placement = engine.place(&profile, &cooc).expect("fits");

        // A takes b1; B's affinity (0.5 * 3/3) beats C's frequency edge.
        let order: Vec<_> = placement.steps.iter().map(|s| s.item.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
        assert_eq!(placement.assignment.blocks_of("A"), &["b1"]);
        assert_eq!(placement.assignment.blocks_of("B"), &["b2"]);
    }

    #[test]
    fn test_tie_breaks_are_natural_order() {
        let g = WarehouseGraph::new(&Layout::two_branch()).expect("valid layout");
        let profile = DemandProfile::new(
            60.0,
            vec![
                ItemDemand::new("i10", 1.0, 1.0, 1, 10, 1),
                ItemDemand::new("i2", 1.0, 1.0, 1, 10, 1),
            ],
        );
        let engine = PlacementEngine::new(&g, &SlottingConfig::default()).expect("valid config");
        let placement = engine.place(&profile, &CoOccurrence::new()).expect("fits");
        // Equal PPS: i2 first; equal LSC between b1, b2, b7, b8: b1 first.
        assert_eq!(placement.steps[0].item, "i2");
        assert_eq!(placement.steps[0].block, "b1");
        assert_eq!(placement.steps[1].block, "b2");
    }

    #[test]
    fn test_zero_requirement_items_skipped() {
        let g = three_block_graph();
        let profile = DemandProfile::new(
            10.0,
            vec![
                ItemDemand::new("A", 1.0, 1.0, 2, 10, 1),
                ItemDemand::new("Z", 1.0, 1.0, 9, 0, 0),
            ],
        );
        let engine = PlacementEngine::new(&g, &SlottingConfig::default()).expect("valid config");
        let placement = engine.place(&profile, &CoOccurrence::new()).expect("fits");
        assert_eq!(placement.assignment.len(), 1);
        assert!(!placement.assignment.is_placed("Z"));
    }

    #[test]
    fn test_idempotent() {
        let g = WarehouseGraph::new(&Layout::two_branch()).expect("valid layout");
        let profile = DemandProfile::new(
            60.0,
            vec![
                ItemDemand::new("A", 1.0, 2.0, 3, 100, 2),
                ItemDemand::new("B", 1.0, 8.0, 2, 50, 1),
                ItemDemand::new("C", 1.0, 3.0, 1, 50, 1),
                ItemDemand::new("D", 1.0, 4.0, 4, 100, 2),
                ItemDemand::new("H", 1.0, 2.0, 3, 150, 3),
            ],
        );
        let cooc = CoOccurrence::from_pairs([
            ("A", "B", 1),
            ("A", "H", 1),
            ("B", "D", 1),
            ("C", "D", 1),
            ("D", "H", 2),
        ]);
        let engine = PlacementEngine::new(&g, &SlottingConfig::default()).expect("valid config");
        let first = engine.place(&profile, &cooc).expect("fits");
        let second = engine.place(&profile, &cooc).expect("fits");
        assert_eq!(first, second);
        assert_eq!(first.assignment.len(), 9);
    }

    #[test]
    fn test_empty_profile() {
        let g = three_block_graph();
        let engine = PlacementEngine::new(&g, &SlottingConfig::default()).expect("valid config");
        let placement = engine
            .place(&DemandProfile::new(10.0, vec![]), &CoOccurrence::new())
            .expect("nothing to place");
        assert!(placement.assignment.is_empty());
        assert!(placement.is_complete());
    }
}
