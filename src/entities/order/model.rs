use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ids::{BeverageId, OrderId, OrderItemId, UserId};
use crate::core::money::OrderTotals;
use crate::core::status::OrderStatus;
use crate::core::validation::validators::{validate_not_blank, validate_tin};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub customer_id: UserId,
    pub stockist_id: Option<UserId>,
    pub status: OrderStatus,
    pub delivery_address: String,
    pub delivery_fee: Decimal,
    pub subtotal: Decimal,
    pub vat_amount: Decimal,
    pub total: Decimal,
    pub customer_tin: Option<String>,
    pub delivery_time: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Customer or assigned stockist
    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.customer_id == user_id || self.stockist_id == Some(user_id)
    }
}

/// Line of an order, priced at order time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub beverage_id: BeverageId,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_id: UserId,
    pub delivery_address: String,
    pub totals: OrderTotals,
    pub customer_tin: Option<String>,
    pub delivery_time: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub beverage_id: BeverageId,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Body of `POST /api/orders`
///
/// Money fields are optional echoes of what the client displayed; when
/// present they must agree with the server's computation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub delivery_address: String,
    pub delivery_fee: Option<Decimal>,
    pub subtotal: Option<Decimal>,
    pub vat_amount: Option<Decimal>,
    pub total: Option<Decimal>,
    #[validate(custom(function = "validate_tin"))]
    pub customer_tin: Option<String>,
    pub delivery_time: Option<String>,
    #[validate(length(min = 1, message = "an order needs at least one item"), nested)]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub beverage_id: BeverageId,
    #[validate(range(min = 1, max = 10_000, message = "quantity must be between 1 and 10000"))]
    pub quantity: u32,
    pub unit_price: Option<Decimal>,
    pub subtotal: Option<Decimal>,
}

/// Body of `PATCH /api/orders/{id}/status`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
    pub stockist_id: Option<UserId>,
}
