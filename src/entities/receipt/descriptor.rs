use super::handlers::{get_receipt_for_order, issue_receipt};
use super::issuer::ReceiptIssuer;
use crate::server::entity_registry::EntityDescriptor;
use axum::{
    Router,
    routing::{get, post},
};

pub struct ReceiptDescriptor {
    pub issuer: ReceiptIssuer,
}

impl ReceiptDescriptor {
    pub fn new(issuer: ReceiptIssuer) -> Self {
        Self { issuer }
    }
}

impl EntityDescriptor for ReceiptDescriptor {
    fn entity_type(&self) -> &str {
        "receipt"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/api/receipts", post(issue_receipt))
            .route("/api/receipts/order/{order_id}", get(get_receipt_for_order))
            .with_state(self.issuer.clone())
    }
}
