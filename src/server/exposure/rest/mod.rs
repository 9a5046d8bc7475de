//! REST exposure
//!
//! Turns a `ServerHost` into the axum router: health checks, the routes of
//! every registered entity, custom routes, then the shared middleware.

use super::super::host::ServerHost;
use super::super::router::with_middleware;
use anyhow::Result;
use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;

pub struct RestExposure;

impl RestExposure {
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Result<Router> {
        tracing::info!(entities = ?host.entity_types(), "Mounting entity routes");
        let mut app = Self::health_routes(&host).merge(host.entity_registry.build_routes());

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        Ok(with_middleware(
            app,
            &host.config.server,
            &host.config.session,
        ))
    }

    fn health_routes(host: &ServerHost) -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
            .with_state(Arc::new(host.config.server.service_name.clone()))
    }

    async fn health_check(State(service): State<Arc<String>>) -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": service.as_str()
        }))
    }
}
