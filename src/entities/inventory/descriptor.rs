use super::handlers::{list_inventory, upsert_inventory};
use super::tracker::InventoryTracker;
use crate::server::entity_registry::EntityDescriptor;
use axum::{
    Router,
    routing::{get, post},
};

/// Inventory lives under the stockist paths
pub struct InventoryDescriptor {
    pub tracker: InventoryTracker,
}

impl InventoryDescriptor {
    pub fn new(tracker: InventoryTracker) -> Self {
        Self { tracker }
    }
}

impl EntityDescriptor for InventoryDescriptor {
    fn entity_type(&self) -> &str {
        "inventory"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/api/stockists/inventory", post(upsert_inventory))
            .route("/api/stockists/{id}/inventory", get(list_inventory))
            .with_state(self.tracker.clone())
    }
}
