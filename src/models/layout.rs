//! Warehouse topology records.

use serde::{Deserialize, Serialize};

/// Role a node plays in the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Start and end point of every picking route.
    Depot,
    /// Aisle intersection; never holds stock.
    Junction,
    /// Storage location holding exactly one item type.
    Block,
}

/// A node record: id plus role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Unique node id.
    pub id: String,
    /// Node role.
    pub role: NodeRole,
}

impl NodeSpec {
    /// Creates a node record.
    pub fn new(id: impl Into<String>, role: NodeRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

/// An undirected weighted edge record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    /// One endpoint.
    pub source: String,
    /// Other endpoint.
    pub target: String,
    /// Walking distance between the endpoints.
    pub weight: f64,
}

impl EdgeSpec {
    /// Creates an edge record.
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }
}

/// Explicit node and edge lists describing a warehouse.
///
/// # Examples
///
/// ```
/// use u_slotting::models::{Layout, NodeRole};
///
/// let layout = Layout::two_branch();
/// assert_eq!(layout.nodes.len(), 19);
/// assert_eq!(
///     layout.nodes.iter().filter(|n| n.role == NodeRole::Block).count(),
///     12
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Node records, in declaration order.
    pub nodes: Vec<NodeSpec>,
    /// Edge records.
    pub edges: Vec<EdgeSpec>,
}

impl Layout {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node record.
    pub fn with_node(mut self, id: impl Into<String>, role: NodeRole) -> Self {
        self.nodes.push(NodeSpec::new(id, role));
        self
    }

    /// Adds an edge record.
    pub fn with_edge(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        weight: f64,
    ) -> Self {
        self.edges.push(EdgeSpec::new(source, target, weight));
        self
    }

    /// The two-branch reference warehouse.
    ///
    /// A depot feeds two aisles (`j1..j3` and `j4..j6`) at distance 3.
    /// Each junction serves two blocks at distance 1, and consecutive
    /// junctions in an aisle are 1 apart, giving blocks `b1..b12`.
    pub fn two_branch() -> Self {
        let mut layout = Self::new().with_node("depot", NodeRole::Depot);
        for j in 1..=6 {
            layout = layout.with_node(format!("j{j}"), NodeRole::Junction);
        }
        for b in 1..=12 {
            layout = layout.with_node(format!("b{b}"), NodeRole::Block);
        }

        for (entry, aisle) in [(1, 0), (4, 6)] {
            layout = layout.with_edge("depot", format!("j{entry}"), 3.0);
            for step in 0..3 {
                let j = entry + step;
                if step < 2 {
                    layout = layout.with_edge(format!("j{j}"), format!("j{}", j + 1), 1.0);
                }
                let first = aisle + 2 * step + 1;
                layout = layout
                    .with_edge(format!("j{j}"), format!("b{first}"), 1.0)
                    .with_edge(format!("j{j}"), format!("b{}", first + 1), 1.0);
            }
        }
        layout
    }
}
