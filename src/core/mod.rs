//! Core types shared by every marketplace entity

pub mod auth;
pub mod error;
pub mod events;
pub mod extractors;
pub mod ids;
pub mod money;
pub mod numbering;
pub mod service;
pub mod status;
pub mod validation;

pub use auth::{AuthContext, AuthPolicy, UserType};
pub use error::{MarketError, MarketResult};
pub use events::{EventBus, MarketEvent};
pub use extractors::{RequireUser, SessionUser};
pub use ids::{BeverageId, InventoryId, OrderId, OrderItemId, ReceiptId, UserId};
pub use money::OrderTotals;
pub use service::MarketStore;
pub use status::OrderStatus;
