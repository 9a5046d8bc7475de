//! Entity descriptor for Order

use super::handlers::{
    create_order, get_order, list_customer_orders, list_stockist_orders, update_order_status,
};
use super::workflow::OrderWorkflow;
use crate::server::entity_registry::EntityDescriptor;
use axum::{
    Router,
    routing::{get, patch, post},
};

pub struct OrderDescriptor {
    pub workflow: OrderWorkflow,
}

impl OrderDescriptor {
    pub fn new(workflow: OrderWorkflow) -> Self {
        Self { workflow }
    }
}

impl EntityDescriptor for OrderDescriptor {
    fn entity_type(&self) -> &str {
        "order"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/api/orders", post(create_order))
            .route("/api/orders/customer", get(list_customer_orders))
            .route("/api/orders/stockist", get(list_stockist_orders))
            .route("/api/orders/{id}", get(get_order))
            .route("/api/orders/{id}/status", patch(update_order_status))
            .with_state(self.workflow.clone())
    }
}
