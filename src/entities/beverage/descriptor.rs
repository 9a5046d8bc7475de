use super::handlers::{CatalogAppState, get_beverage, list_beverages};
use crate::server::entity_registry::EntityDescriptor;
use axum::{Router, routing::get};

pub struct BeverageDescriptor {
    pub state: CatalogAppState,
}

impl BeverageDescriptor {
    pub fn new(state: CatalogAppState) -> Self {
        Self { state }
    }
}

impl EntityDescriptor for BeverageDescriptor {
    fn entity_type(&self) -> &str {
        "beverage"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/api/beverages", get(list_beverages))
            .route("/api/beverages/{id}", get(get_beverage))
            .with_state(self.state.clone())
    }
}
