//! Per-stockist stock levels

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod tracker;

pub use descriptor::InventoryDescriptor;
pub use model::{InventoryEntry, StockistInventory, UpsertInventoryRequest};
pub use tracker::InventoryTracker;
