//! Marketplace entities
//!
//! Each entity module follows the same layout: `model` (types and request
//! bodies), a service holding its rules, `handlers` and a `descriptor` that
//! contributes its routes to the [`EntityRegistry`].

pub mod beverage;
pub mod inventory;
pub mod order;
pub mod receipt;
pub mod stockist;
pub mod user;

use crate::server::entity_registry::EntityRegistry;
use crate::server::host::ServerHost;

/// Register the routes of every entity against the host's services.
pub fn register_entities(host: &ServerHost, registry: &mut EntityRegistry) {
    registry.register(Box::new(user::UserDescriptor::new(host.accounts())));
    registry.register(Box::new(beverage::BeverageDescriptor::new(
        beverage::CatalogAppState {
            store: host.store.clone(),
        },
    )));
    registry.register(Box::new(stockist::StockistDescriptor::new(
        stockist::StockistAppState {
            store: host.store.clone(),
            matcher: host.matcher.clone(),
        },
    )));
    registry.register(Box::new(inventory::InventoryDescriptor::new(
        host.inventory(),
    )));
    registry.register(Box::new(order::OrderDescriptor::new(host.orders())));
    registry.register(Box::new(receipt::ReceiptDescriptor::new(host.receipts())));
}
