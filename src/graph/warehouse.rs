//! Weighted warehouse graph with memoised shortest-path distances.

use std::collections::HashMap;
use std::sync::OnceLock;

use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::error::{Result, SlottingError};
use crate::ids::sort_natural_by;
use crate::models::{Layout, NodeRole};

/// Dense handle to a node of a [`WarehouseGraph`].
///
/// Handles are only meaningful for the graph that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Undirected weighted graph of depot, junction, and block nodes.
///
/// Shortest-path rows are computed with Dijkstra on first use per source
/// node and kept for the lifetime of the graph. The graph never changes
/// after construction, so cached rows never go stale.
///
/// # Examples
///
/// ```
/// use u_slotting::graph::WarehouseGraph;
/// use u_slotting::models::Layout;
///
/// let graph = WarehouseGraph::new(&Layout::two_branch()).unwrap();
/// assert_eq!(graph.depot(), "depot");
/// assert_eq!(graph.distance("depot", "b1").unwrap(), 4.0);
/// assert_eq!(graph.distance("b1", "b7").unwrap(), 8.0);
/// assert!(graph.distance("depot", "nowhere").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct WarehouseGraph {
    graph: UnGraph<NodeRole, f64>,
    ids: Vec<String>,
    index: HashMap<String, NodeId>,
    depot: NodeId,
    blocks: Vec<NodeId>,
    rows: Vec<OnceLock<Vec<f64>>>,
}

impl WarehouseGraph {
    /// Builds a graph from explicit node and edge records.
    ///
    /// # Errors
    ///
    /// - [`SlottingError::DuplicateNode`] if two nodes share an id
    /// - [`SlottingError::NodeNotFound`] if an edge names an unknown node
    /// - [`SlottingError::InvalidWeight`] for negative or non-finite weights
    /// - [`SlottingError::MissingDepot`] / [`SlottingError::MultipleDepots`]
    ///   unless exactly one depot is declared
    /// - [`SlottingError::Disconnected`] if a node cannot be reached from
    ///   the depot
    pub fn new(layout: &Layout) -> Result<Self> {
        let mut graph = UnGraph::with_capacity(layout.nodes.len(), layout.edges.len());
        let mut ids = Vec::with_capacity(layout.nodes.len());
        let mut index = HashMap::with_capacity(layout.nodes.len());
        let mut depots = Vec::new();
        let mut blocks = Vec::new();

        for node in &layout.nodes {
            let id = NodeId(graph.add_node(node.role).index());
            if index.insert(node.id.clone(), id).is_some() {
                return Err(SlottingError::DuplicateNode(node.id.clone()));
            }
            ids.push(node.id.clone());
            match node.role {
                NodeRole::Depot => depots.push(id),
                NodeRole::Block => blocks.push(id),
                NodeRole::Junction => {}
            }
        }

        let depot = match depots.as_slice() {
            [] => return Err(SlottingError::MissingDepot),
            [depot] => *depot,
            many => {
                return Err(SlottingError::MultipleDepots(
                    many.iter().map(|d| ids[d.0].clone()).collect(),
                ))
            }
        };

        for edge in &layout.edges {
            if !edge.weight.is_finite() || edge.weight < 0.0 {
                return Err(SlottingError::InvalidWeight {
                    source_id: edge.source.clone(),
                    target_id: edge.target.clone(),
                    weight: edge.weight,
                });
            }
            let a = lookup(&index, &edge.source)?;
            let b = lookup(&index, &edge.target)?;
            graph.add_edge(NodeIndex::new(a.0), NodeIndex::new(b.0), edge.weight);
        }

        sort_natural_by(&mut blocks, |b| ids[b.0].as_str());
        let rows = (0..ids.len()).map(|_| OnceLock::new()).collect();

        let wg = Self {
            graph,
            ids,
            index,
            depot,
            blocks,
            rows,
        };

        if let Some(pos) = wg.row(depot).iter().position(|d| !d.is_finite()) {
            return Err(SlottingError::Disconnected(wg.ids[pos].clone()));
        }

        Ok(wg)
    }

    /// Shortest-path length between two nodes by id.
    ///
    /// Returns 0 when `a == b`.
    ///
    /// # Errors
    ///
    /// [`SlottingError::NodeNotFound`] if either id is absent.
    pub fn distance(&self, a: &str, b: &str) -> Result<f64> {
        let from = self.node_id(a)?;
        let to = self.node_id(b)?;
        Ok(self.distance_between(from, to))
    }

    /// Shortest-path length between two resolved nodes.
    pub fn distance_between(&self, from: NodeId, to: NodeId) -> f64 {
        if from == to {
            return 0.0;
        }
        self.row(from)[to.0]
    }

    /// Distance from the depot to a resolved node.
    pub fn depot_distance(&self, to: NodeId) -> f64 {
        self.distance_between(self.depot, to)
    }

    /// Resolves a node id to its handle.
    ///
    /// # Errors
    ///
    /// [`SlottingError::NodeNotFound`] if the id is absent.
    pub fn node_id(&self, id: &str) -> Result<NodeId> {
        lookup(&self.index, id)
    }

    /// Id of a resolved node.
    pub fn name(&self, node: NodeId) -> &str {
        &self.ids[node.0]
    }

    /// Role of a resolved node.
    pub fn role(&self, node: NodeId) -> NodeRole {
        self.graph[NodeIndex::new(node.0)]
    }

    /// Id of the depot.
    pub fn depot(&self) -> &str {
        &self.ids[self.depot.0]
    }

    /// Handle of the depot.
    pub fn depot_id(&self) -> NodeId {
        self.depot
    }

    /// Block handles in natural id order.
    pub fn block_ids(&self) -> &[NodeId] {
        &self.blocks
    }

    /// Block ids in natural order.
    pub fn blocks(&self) -> Vec<&str> {
        self.blocks.iter().map(|&b| self.name(b)).collect()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn row(&self, from: NodeId) -> &[f64] {
        self.rows[from.0].get_or_init(|| {
            let reached = dijkstra(&self.graph, NodeIndex::new(from.0), None, |e| *e.weight());
            let mut row = vec![f64::INFINITY; self.ids.len()];
            for (node, dist) in reached {
                row[node.index()] = dist;
            }
            row
        })
    }
}

fn lookup(index: &HashMap<String, NodeId>, id: &str) -> Result<NodeId> {
    index
        .get(id)
        .copied()
        .ok_or_else(|| SlottingError::NodeNotFound(id.to_string()))
}
