//! Order-replay simulation of a block assignment.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::config::RouteConfig;
use crate::demand::{DemandProfile, ItemDemand};
use crate::error::{Result, SlottingError};
use crate::graph::{NodeId, WarehouseGraph};
use crate::ids::{natural_cmp, sort_natural_by};
use crate::models::{units_per_block, Assignment, Order, OrderKey};

use super::route::{nearest_neighbor_route, tour_length, two_opt_improve};

/// Diagnostics for one replayed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderMetrics {
    /// Order grouping key.
    pub key: OrderKey,
    /// Closed pick-route length.
    pub distance: f64,
    /// `Σ weight × taken × d(depot, block)` over the order's picks.
    pub handling_effort: f64,
    /// Visited node ids, starting and ending at the depot.
    pub route: Vec<String>,
    /// Requested units that no block could supply, per item.
    pub unfilled: BTreeMap<String, u64>,
    /// Requested items with no block in the assignment.
    pub skipped_items: Vec<String>,
}

/// Aggregate and per-order results of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Sum of order distances.
    pub total_distance: f64,
    /// Sum of order handling efforts.
    pub total_handling_effort: f64,
    /// Per-order diagnostics in natural key order.
    pub orders: Vec<OrderMetrics>,
}

impl EvaluationReport {
    /// Number of evaluated orders.
    pub fn num_orders(&self) -> usize {
        self.orders.len()
    }

    /// Total units that could not be supplied across all orders.
    pub fn total_unfilled(&self) -> u64 {
        self.orders
            .iter()
            .flat_map(|o| o.unfilled.values())
            .sum()
    }
}

/// Replays orders against an assignment with finite per-block stock.
///
/// Each block starts with `floor(block_capacity / size)` units of its item.
/// Stock is drawn down across orders within one [`Evaluator::evaluate`] call
/// and reset on the next call.
///
/// # Examples
///
/// ```
/// use u_slotting::config::RouteConfig;
/// use u_slotting::demand::{DemandProfile, ItemDemand};
/// use u_slotting::evaluation::Evaluator;
/// use u_slotting::graph::WarehouseGraph;
/// use u_slotting::models::{Assignment, Layout, Order, OrderKey};
///
/// let graph = WarehouseGraph::new(&Layout::two_branch()).unwrap();
/// let profile = DemandProfile::new(10.0, vec![ItemDemand::new("A", 1.0, 2.0, 1, 5, 1)]);
/// let mut assignment = Assignment::new();
/// assignment.assign("b1", "A");
///
/// let mut order = Order::new(OrderKey::customer("p1"));
/// order.add("A", 5).unwrap();
///
/// let report = Evaluator::new(&graph, &profile, RouteConfig::default())
///     .evaluate(&assignment, &[order])
///     .unwrap();
/// assert_eq!(report.total_distance, 8.0);
/// assert_eq!(report.total_handling_effort, 2.0 * 5.0 * 4.0);
/// assert_eq!(report.orders[0].route, ["depot", "b1", "depot"]);
/// ```
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    graph: &'a WarehouseGraph,
    profile: &'a DemandProfile,
    route: RouteConfig,
}

struct Stock<'a> {
    item: &'a ItemDemand,
    blocks: Vec<(NodeId, u64)>,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator over `graph` using item sizes and weights from
    /// `profile`.
    pub fn new(graph: &'a WarehouseGraph, profile: &'a DemandProfile, route: RouteConfig) -> Self {
        Self {
            graph,
            profile,
            route,
        }
    }

    /// Simulates every order against `assignment`.
    ///
    /// # Errors
    ///
    /// - [`SlottingError::MissingItemMaster`] if an assigned item is not in
    ///   the profile
    /// - [`SlottingError::NodeNotFound`] if an assigned block is not in the
    ///   graph
    pub fn evaluate(&self, assignment: &Assignment, orders: &[Order]) -> Result<EvaluationReport> {
        let mut stock = self.initial_stock(assignment)?;

        let mut sorted: Vec<&Order> = orders.iter().collect();
        sorted.sort_by(|a, b| a.key().cmp(b.key()));

        let mut report = EvaluationReport {
            total_distance: 0.0,
            total_handling_effort: 0.0,
            orders: Vec::with_capacity(sorted.len()),
        };
        for order in sorted {
            let metrics = self.replay(order, &mut stock);
            report.total_distance += metrics.distance;
            report.total_handling_effort += metrics.handling_effort;
            report.orders.push(metrics);
        }

        tracing::info!(
            orders = report.num_orders(),
            total_distance = report.total_distance,
            total_handling_effort = report.total_handling_effort,
            unfilled = report.total_unfilled(),
            "evaluation finished"
        );
        Ok(report)
    }

    fn initial_stock(&self, assignment: &Assignment) -> Result<BTreeMap<String, Stock<'a>>> {
        let capacity = self.profile.block_capacity();
        let mut stock = BTreeMap::new();
        for (item_id, blocks) in assignment.items() {
            let item = self
                .profile
                .get(item_id)
                .ok_or_else(|| SlottingError::MissingItemMaster {
                    item: item_id.to_string(),
                })?;
            let units = units_per_block(item.size, capacity);
            let blocks = blocks
                .iter()
                .map(|b| Ok((self.graph.node_id(b)?, units)))
                .collect::<Result<Vec<_>>>()?;
            stock.insert(item_id.to_string(), Stock { item, blocks });
        }
        Ok(stock)
    }

    fn replay(&self, order: &Order, stock: &mut BTreeMap<String, Stock<'a>>) -> OrderMetrics {
        let mut lines: Vec<(&str, u64)> = order.lines().filter(|&(_, qty)| qty > 0).collect();
        sort_natural_by(&mut lines, |line| line.0);

        let mut visited: BTreeSet<NodeId> = BTreeSet::new();
        let mut effort = 0.0;
        let mut unfilled = BTreeMap::new();
        let mut skipped = Vec::new();

        for (item_id, requested) in lines {
            let Some(entry) = stock.get_mut(item_id) else {
                skipped.push(item_id.to_string());
                continue;
            };
            let mut remaining = requested;
            while remaining > 0 {
                let Some(slot) = self.next_block(&entry.blocks, remaining) else {
                    break;
                };
                let (block, available) = &mut entry.blocks[slot];
                let taken = remaining.min(*available);
                *available -= taken;
                remaining -= taken;
                effort += entry.item.weight * taken as f64 * self.graph.depot_distance(*block);
                visited.insert(*block);
            }
            if remaining > 0 {
                unfilled.insert(item_id.to_string(), remaining);
            }
        }

        let stops: Vec<NodeId> = visited.into_iter().collect();
        let mut route = nearest_neighbor_route(self.graph, &stops);
        if self.route.two_opt {
            route = two_opt_improve(self.graph, &route);
        }
        let distance = tour_length(self.graph, &route);

        let depot = self.graph.depot().to_string();
        let mut path = Vec::with_capacity(route.len() + 2);
        path.push(depot.clone());
        path.extend(route.iter().map(|&n| self.graph.name(n).to_string()));
        path.push(depot);

        tracing::debug!(order = %order.key(), distance, effort, stops = route.len(), "order replayed");

        OrderMetrics {
            key: order.key().clone(),
            distance,
            handling_effort: effort,
            route: path,
            unfilled,
            skipped_items: skipped,
        }
    }

    /// Picks the next block to draw from: blocks able to cover `remaining`
    /// alone come first, then nearer blocks, then natural id order.
    fn next_block(&self, blocks: &[(NodeId, u64)], remaining: u64) -> Option<usize> {
        blocks
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.1 > 0)
            .min_by(|(_, a), (_, b)| {
                let short_a = a.1 < remaining;
                let short_b = b.1 < remaining;
                short_a
                    .cmp(&short_b)
                    .then_with(|| {
                        self.graph
                            .depot_distance(a.0)
                            .total_cmp(&self.graph.depot_distance(b.0))
                    })
                    .then_with(|| natural_cmp(self.graph.name(a.0), self.graph.name(b.0)))
            })
            .map(|(slot, _)| slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Layout, NodeRole};

    /// depot with blocks n2 at distance 2 and f5 at distance 5.
    fn near_far() -> WarehouseGraph {
        let layout = Layout::new()
            .with_node("depot", NodeRole::Depot)
            .with_node("n2", NodeRole::Block)
            .with_node("f5", NodeRole::Block)
            .with_edge("depot", "n2", 2.0)
            .with_edge("depot", "f5", 5.0);
        WarehouseGraph::new(&layout).expect("valid layout")
    }

    fn order(customer: &str, lines: &[(&str, u64)]) -> Order {
        let mut o = Order::new(OrderKey::customer(customer));
        for &(item, qty) in lines {
            o.add(item, qty).expect("fits");
        }
        o
    }

    #[test]
    fn test_split_pick_effort() {
        let g = near_far();
        let profile = DemandProfile::new(10.0, vec![ItemDemand::new("X", 1.0, 3.0, 1, 20, 2)]);
        let mut a = Assignment::new();
        a.assign("n2", "X");
        a.assign("f5", "X");

        let report = Evaluator::new(&g, &profile, RouteConfig::default())
            .evaluate(&a, &[order("p1", &[("X", 15)])])
            .expect("evaluates");

        assert_eq!(report.total_handling_effort, 3.0 * (10.0 * 2.0 + 5.0 * 5.0));
        assert_eq!(report.orders[0].route, vec!["depot", "n2", "f5", "depot"]);
        assert_eq!(report.total_distance, 2.0 + 7.0 + 5.0);
        assert!(report.orders[0].unfilled.is_empty());
    }

    #[test]
    fn test_one_stop_preferred_over_nearest() {
        let g = near_far();
        // n2 holds 10 units, f5 holds 20: only f5 covers 15 alone
        let profile = DemandProfile::new(20.0, vec![ItemDemand::new("X", 1.0, 1.0, 1, 30, 2)]);
        let mut a = Assignment::new();
        a.assign("n2", "X");
        a.assign("f5", "X");
        let evaluator = Evaluator::new(&g, &profile, RouteConfig::default());
        // drain n2 to 10 units first
        let report = evaluator
            .evaluate(&a, &[order("p1", &[("X", 10)]), order("p2", &[("X", 15)])])
            .expect("evaluates");

        assert_eq!(report.orders[0].route, vec!["depot", "n2", "depot"]);
        assert_eq!(report.orders[1].route, vec!["depot", "f5", "depot"]);
        assert_eq!(report.orders[1].handling_effort, 15.0 * 5.0);
    }

    #[test]
    fn test_unplaced_items_skipped() {
        let g = near_far();
        let profile = DemandProfile::new(10.0, vec![ItemDemand::new("X", 1.0, 1.0, 1, 5, 1)]);
        let report = Evaluator::new(&g, &profile, RouteConfig::default())
            .evaluate(&Assignment::new(), &[order("p1", &[("X", 3), ("Y", 1)])])
            .expect("evaluates");

        let m = &report.orders[0];
        assert_eq!(m.distance, 0.0);
        assert_eq!(m.handling_effort, 0.0);
        assert_eq!(m.route, vec!["depot", "depot"]);
        assert_eq!(m.skipped_items, vec!["X", "Y"]);
    }

    #[test]
    fn test_stock_shortfall_recorded() {
        let g = near_far();
        let profile = DemandProfile::new(10.0, vec![ItemDemand::new("X", 2.0, 1.0, 1, 5, 1)]);
        let mut a = Assignment::new();
        a.assign("f5", "X");
        let report = Evaluator::new(&g, &profile, RouteConfig::default())
            .evaluate(&a, &[order("p1", &[("X", 7)])])
            .expect("evaluates");
        // 10 / 2 = 5 units in stock
        assert_eq!(report.orders[0].unfilled.get("X"), Some(&2));
        assert_eq!(report.total_unfilled(), 2);
        assert_eq!(report.total_handling_effort, 25.0);
    }

    #[test]
    fn test_orders_replayed_in_natural_order() {
        let g = near_far();
        let profile = DemandProfile::new(10.0, vec![ItemDemand::new("X", 1.0, 1.0, 2, 10, 1)]);
        let mut a = Assignment::new();
        a.assign("n2", "X");
        let report = Evaluator::new(&g, &profile, RouteConfig::default())
            .evaluate(&a, &[order("p10", &[("X", 8)]), order("p2", &[("X", 8)])])
            .expect("evaluates");
        assert_eq!(report.orders[0].key, OrderKey::customer("p2"));
        assert!(report.orders[0].unfilled.is_empty());
        assert_eq!(report.orders[1].unfilled.get("X"), Some(&6));
    }

    #[test]
    fn test_assigned_item_without_master() {
        let g = near_far();
        let profile = DemandProfile::new(10.0, vec![]);
        let mut a = Assignment::new();
        a.assign("n2", "Q");
        let result = Evaluator::new(&g, &profile, RouteConfig::default()).evaluate(&a, &[]);
        assert!(matches!(result, Err(SlottingError::MissingItemMaster { item }) if item == "Q"));
    }

    #[test]
    fn test_unknown_block_rejected() {
        let g = near_far();
        let profile = DemandProfile::new(10.0, vec![ItemDemand::new("X", 1.0, 1.0, 1, 5, 1)]);
        let mut a = Assignment::new();
        a.assign("b99", "X");
        let result = Evaluator::new(&g, &profile, RouteConfig::default()).evaluate(&a, &[]);
        assert!(matches!(result, Err(SlottingError::NodeNotFound(_))));
    }

    #[test]
    fn test_two_opt_never_worse() {
        let g = WarehouseGraph::new(&Layout::two_branch()).expect("valid layout");
        let items: Vec<ItemDemand> = ["A", "B", "C", "D"]
            .iter()
            .map(|id| ItemDemand::new(*id, 1.0, 1.0, 1, 10, 1))
            .collect();
        let profile = DemandProfile::new(10.0, items);
        let mut a = Assignment::new();
        for (block, item) in [("b1", "A"), ("b7", "B"), ("b6", "C"), ("b12", "D")] {
            a.assign(block, item);
        }
        let orders = [order("p1", &[("A", 1), ("B", 1), ("C", 1), ("D", 1)])];
        let plain = Evaluator::new(&g, &profile, RouteConfig::default())
            .evaluate(&a, &orders)
            .expect("evaluates");
        let refined = Evaluator::new(&g, &profile, RouteConfig { two_opt: true })
            .evaluate(&a, &orders)
            .expect("evaluates");
        assert!(refined.total_distance <= plain.total_distance);
        assert_eq!(refined.total_handling_effort, plain.total_handling_effort);
    }
}
