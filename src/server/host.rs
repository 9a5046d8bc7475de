//! Server host: the state behind every exposure
//!
//! Holds the store, configuration, event bus and matcher, hands out the
//! services built on them, and keeps the registry of entity routes.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::events::EventBus;
use crate::core::service::MarketStore;
use crate::entities::inventory::InventoryTracker;
use crate::entities::order::OrderWorkflow;
use crate::entities::receipt::ReceiptIssuer;
use crate::entities::stockist::StockistMatcher;
use crate::entities::user::AccountService;
use crate::server::entity_registry::EntityRegistry;

pub struct ServerHost {
    pub config: Arc<AppConfig>,

    pub store: Arc<dyn MarketStore>,

    pub matcher: Arc<dyn StockistMatcher>,

    /// Domain events; the binary attaches a logger, tests may subscribe
    pub event_bus: EventBus,

    /// Routes of every marketplace entity
    pub entity_registry: EntityRegistry,
}

impl ServerHost {
    /// Build the host and register the routes of every entity.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn MarketStore>,
        matcher: Arc<dyn StockistMatcher>,
        event_bus: EventBus,
    ) -> Self {
        let mut host = Self {
            config: Arc::new(config),
            store,
            matcher,
            event_bus,
            entity_registry: EntityRegistry::new(),
        };

        let mut registry = EntityRegistry::new();
        crate::entities::register_entities(&host, &mut registry);
        host.entity_registry = registry;
        host
    }

    pub fn entity_types(&self) -> Vec<&str> {
        self.entity_registry.entity_types()
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.store.clone(), self.event_bus.clone())
    }

    pub fn orders(&self) -> OrderWorkflow {
        OrderWorkflow::new(
            self.store.clone(),
            self.config.clone(),
            self.event_bus.clone(),
        )
    }

    pub fn receipts(&self) -> ReceiptIssuer {
        ReceiptIssuer::new(
            self.store.clone(),
            self.config.clone(),
            self.event_bus.clone(),
        )
    }

    pub fn inventory(&self) -> InventoryTracker {
        InventoryTracker::new(self.store.clone(), self.event_bus.clone())
    }
}
