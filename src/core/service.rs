//! Repository traits for the marketplace tables
//!
//! Handlers and workflows only see these traits; the in-memory store is one
//! implementation and a relational backend can be another. Every method is a
//! single atomic operation against the store.

use async_trait::async_trait;

use crate::core::auth::UserType;
use crate::core::error::MarketResult;
use crate::core::ids::{BeverageId, OrderId, UserId};
use crate::core::status::OrderStatus;
use crate::entities::beverage::{Beverage, NewBeverage};
use crate::entities::inventory::StockistInventory;
use crate::entities::order::{NewOrder, NewOrderItem, Order, OrderItem};
use crate::entities::receipt::{NewVatReceipt, VatReceipt};
use crate::entities::user::{NewUser, User};

/// User accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; a taken username is a conflict
    async fn create_user(&self, user: NewUser) -> MarketResult<User>;

    async fn get_user(&self, id: UserId) -> MarketResult<Option<User>>;

    async fn get_user_by_username(&self, username: &str) -> MarketResult<Option<User>>;

    async fn list_users_by_type(&self, user_type: UserType) -> MarketResult<Vec<User>>;
}

/// Beverage catalog
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn insert_beverage(&self, beverage: NewBeverage) -> MarketResult<Beverage>;

    async fn get_beverage(&self, id: BeverageId) -> MarketResult<Option<Beverage>>;

    async fn list_beverages(&self) -> MarketResult<Vec<Beverage>>;

    /// `all` returns the full catalog; anything else is a case-insensitive
    /// exact match on the category
    async fn list_beverages_by_category(&self, category: &str) -> MarketResult<Vec<Beverage>>;
}

/// Per-stockist stock levels
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Insert or overwrite the row for (stockist, beverage)
    async fn upsert_inventory(
        &self,
        stockist_id: UserId,
        beverage_id: BeverageId,
        quantity: u32,
    ) -> MarketResult<StockistInventory>;

    async fn list_inventory(&self, stockist_id: UserId) -> MarketResult<Vec<StockistInventory>>;
}

/// Orders and their lines
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert the order and all of its items in one write
    async fn create_order_with_items(
        &self,
        order: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> MarketResult<(Order, Vec<OrderItem>)>;

    async fn get_order(&self, id: OrderId) -> MarketResult<Option<Order>>;

    async fn get_order_by_number(&self, order_number: &str) -> MarketResult<Option<Order>>;

    async fn list_order_items(&self, order_id: OrderId) -> MarketResult<Vec<OrderItem>>;

    /// Newest first
    async fn list_orders_by_customer(&self, customer_id: UserId) -> MarketResult<Vec<Order>>;

    /// Newest first
    async fn list_orders_by_stockist(&self, stockist_id: UserId) -> MarketResult<Vec<Order>>;

    /// Compare-and-set the status: fails with a conflict when the stored
    /// status is no longer `expected`. `stockist_id`, when given, is assigned
    /// in the same write.
    async fn update_order_status(
        &self,
        id: OrderId,
        expected: OrderStatus,
        next: OrderStatus,
        stockist_id: Option<UserId>,
    ) -> MarketResult<Order>;
}

/// VAT receipts
#[async_trait]
pub trait ReceiptRepository: Send + Sync {
    /// Insert the receipt and complete its order in one write.
    ///
    /// Fails when the order is missing, not delivered, or already has a
    /// receipt.
    async fn issue_receipt(&self, receipt: NewVatReceipt) -> MarketResult<(VatReceipt, Order)>;

    async fn get_receipt_by_order(&self, order_id: OrderId) -> MarketResult<Option<VatReceipt>>;
}

/// Everything the marketplace needs from its store
pub trait MarketStore:
    UserRepository + CatalogRepository + InventoryRepository + OrderRepository + ReceiptRepository
{
}

impl<T> MarketStore for T where
    T: UserRepository
        + CatalogRepository
        + InventoryRepository
        + OrderRepository
        + ReceiptRepository
{
}
