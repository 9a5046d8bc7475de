use super::handlers::{StockistAppState, nearby_stockists};
use crate::server::entity_registry::EntityDescriptor;
use axum::{Router, routing::get};

pub struct StockistDescriptor {
    pub state: StockistAppState,
}

impl StockistDescriptor {
    pub fn new(state: StockistAppState) -> Self {
        Self { state }
    }
}

impl EntityDescriptor for StockistDescriptor {
    fn entity_type(&self) -> &str {
        "stockist"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/api/stockists/nearby", get(nearby_stockists))
            .with_state(self.state.clone())
    }
}
