//! ServerBuilder for assembling and serving the marketplace

use super::exposure::RestExposure;
use super::host::ServerHost;
use crate::config::AppConfig;
use crate::core::events::EventBus;
use crate::core::service::MarketStore;
use crate::entities::stockist::{RandomQuoteMatcher, StockistMatcher};
use crate::storage::{InMemoryMarketStore, seed_store};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the marketplace server
///
/// Everything is optional: defaults are the built-in configuration, an empty
/// in-memory store and the random quote matcher.
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(AppConfig::load()?)
///     .build()
///     .await?;
/// ```
pub struct ServerBuilder {
    config: Option<AppConfig>,
    store: Option<Arc<dyn MarketStore>>,
    matcher: Option<Arc<dyn StockistMatcher>>,
    event_bus: Option<EventBus>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            store: None,
            matcher: None,
            event_bus: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this store instead of a fresh in-memory one. The configured seed
    /// is still applied to it.
    pub fn with_store(mut self, store: impl MarketStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    pub fn with_matcher(mut self, matcher: impl StockistMatcher + 'static) -> Self {
        self.matcher = Some(Arc::new(matcher));
        self
    }

    /// Share an existing bus, e.g. to observe events from a test.
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Extra routes merged next to the entity routes; they get the same
    /// session and trace layers.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Seed the store and assemble the host
    pub async fn build_host(&mut self) -> Result<ServerHost> {
        let config = self.config.take().unwrap_or_default();
        config.validate()?;

        let store = self
            .store
            .take()
            .unwrap_or_else(|| Arc::new(InMemoryMarketStore::new()));
        seed_store(store.as_ref(), &config.seed).await?;

        let matcher = self
            .matcher
            .take()
            .unwrap_or_else(|| Arc::new(RandomQuoteMatcher::new()));
        let event_bus = self
            .event_bus
            .take()
            .unwrap_or_else(|| EventBus::new(config.events.capacity));

        Ok(ServerHost::new(config, store, matcher, event_bus))
    }

    /// Build the REST router
    pub async fn build(mut self) -> Result<Router> {
        let host = Arc::new(self.build_host().await?);
        RestExposure::build_router(host, std::mem::take(&mut self.custom_routes))
    }

    /// Serve on `server.bind` until Ctrl+C or SIGTERM
    pub async fn serve(mut self) -> Result<()> {
        let host = Arc::new(self.build_host().await?);
        let addr = host.config.server.bind.clone();
        let event_logger = host.event_bus.spawn_logger();
        let app = RestExposure::build_router(host, std::mem::take(&mut self.custom_routes))?;

        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        event_logger.abort();
        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::service::CatalogRepository;
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_build_host_seeds_catalog() {
        let store = InMemoryMarketStore::new();
        let mut builder = ServerBuilder::new().with_store(store.clone());
        let host = builder.build_host().await.unwrap();

        assert_eq!(store.list_beverages().await.unwrap().len(), 6);
        assert_eq!(host.entity_types().len(), 6);
    }

    #[tokio::test]
    async fn test_shared_store_is_seeded_once() {
        let store = InMemoryMarketStore::new();
        ServerBuilder::new().with_store(store.clone()).build().await.unwrap();
        ServerBuilder::new().with_store(store.clone()).build().await.unwrap();

        assert_eq!(store.list_beverages().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let mut config = AppConfig::default_config();
        config.orders.number_prefix.clear();
        let result = ServerBuilder::new().with_config(config).build().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_custom_routes_are_merged() {
        let app = ServerBuilder::new()
            .with_custom_routes(Router::new().route("/ping", axum::routing::get(|| async { "pong" })))
            .build()
            .await
            .unwrap();

        let server = TestServer::new(app);
        server.get("/ping").await.assert_text("pong");
        server.get("/health").await.assert_status_ok();
    }
}
