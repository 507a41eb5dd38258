//! Domain model types for warehouse slotting.
//!
//! Provides the plain data records exchanged between components: the
//! warehouse topology, item master and inventory rows, order lines grouped
//! into orders, and the block-to-item assignment produced by placement.

mod assignment;
mod item;
mod layout;
mod order;

pub use assignment::Assignment;
pub use item::{blocks_for, units_per_block, InventoryLine, ItemSpec};
pub use layout::{EdgeSpec, Layout, NodeRole, NodeSpec};
pub use order::{Order, OrderKey, OrderLine};
