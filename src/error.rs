//! Error types for slotting runs.

use std::io;

use thiserror::Error;

use crate::placement::Placement;

/// Errors raised while building, placing, or evaluating a warehouse layout.
#[derive(Debug, Error)]
pub enum SlottingError {
    /// A node id was referenced that the graph does not contain.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// Two node records share the same id.
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    /// The layout has no depot node.
    #[error("layout has no depot node")]
    MissingDepot,

    /// The layout has more than one depot node.
    #[error("layout has multiple depot nodes: {0:?}")]
    MultipleDepots(Vec<String>),

    /// An edge weight is negative or not finite.
    #[error("invalid weight {weight} on edge {source_id} -- {target_id}")]
    InvalidWeight {
        /// Edge source id.
        source_id: String,
        /// Edge target id.
        target_id: String,
        /// Offending weight.
        weight: f64,
    },

    /// A node cannot be reached from the depot.
    #[error("node {0} is not reachable from the depot")]
    Disconnected(String),

    /// An item is referenced by orders, inventory, or a layout but has no
    /// item master record.
    #[error("item {item} has no item master record")]
    MissingItemMaster {
        /// Item id.
        item: String,
    },

    /// An item master record carries an unusable size or weight.
    #[error("invalid item {item}: {reason}")]
    InvalidItem {
        /// Item id.
        item: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Summed quantities or the derived block count of an item do not fit
    /// the integer range.
    #[error("quantity of item {item} overflows")]
    QuantityOverflow {
        /// Item id.
        item: String,
    },

    /// Free blocks ran out before every item received its required count.
    ///
    /// The partial placement is kept so undersized layouts can be diagnosed.
    #[error("ran out of blocks: {placed} of {required} required blocks placed")]
    BlockExhaustion {
        /// Total required blocks over all items.
        required: usize,
        /// Blocks assigned before exhaustion.
        placed: usize,
        /// Placement state at the time of exhaustion.
        partial: Box<Placement>,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Filesystem failure in the outer I/O layer.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// Malformed CSV input.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON input or output failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SlottingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let err = SlottingError::MissingItemMaster {
            item: "A".to_string(),
        };
        assert_eq!(err.to_string(), "item A has no item master record");

        let err = SlottingError::InvalidWeight {
            source_id: "j1".to_string(),
            target_id: "b1".to_string(),
            weight: -1.0,
        };
        assert!(err.to_string().contains("j1 -- b1"));
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: SlottingError = io_err.into();
        assert!(matches!(err, SlottingError::Io(_)));
    }
}
