//! # stockist-hub
//!
//! Beverage ordering marketplace: business customers order crates from local
//! stockists, orders move through an enforced lifecycle, and delivery is
//! closed out with a VAT receipt.
//!
//! ## Features
//!
//! - **Order workflow**: server-side pricing and totals, a status state machine
//!   applied with compare-and-set
//! - **VAT receipts**: one per order, issued atomically with order completion
//! - **Inventory**: per-stockist stock levels with upsert semantics
//! - **Stockist matching**: quotes behind a [`StockistMatcher`](entities::stockist::StockistMatcher) trait
//! - **Accounts**: argon2 password hashing and cookie sessions
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stockist_hub::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_config(AppConfig::load()?)
//!         .serve()
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AuthContext, AuthPolicy, UserType},
        error::{MarketError, MarketResult},
        events::{EventBus, EventEnvelope, MarketEvent},
        extractors::{RequireUser, SessionUser},
        ids::{BeverageId, InventoryId, OrderId, OrderItemId, ReceiptId, UserId},
        money::OrderTotals,
        service::{
            CatalogRepository, InventoryRepository, MarketStore, OrderRepository,
            ReceiptRepository, UserRepository,
        },
        status::OrderStatus,
        validation::ValidatedJson,
    };

    // === Entities ===
    pub use crate::entities::{
        beverage::Beverage,
        inventory::{InventoryTracker, StockistInventory},
        order::{Order, OrderItem, OrderWorkflow},
        receipt::{ReceiptIssuer, VatReceipt},
        stockist::{NearbyStockist, RandomQuoteMatcher, StockistMatcher},
        user::{AccountService, User},
    };

    // === Storage ===
    pub use crate::storage::{InMemoryMarketStore, default_catalog, seed_store};

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{EntityDescriptor, EntityRegistry, ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use rust_decimal::Decimal;
}
