use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ids::{BeverageId, InventoryId, UserId};
use crate::entities::beverage::Beverage;

/// Crates of one beverage held by one stockist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockistInventory {
    pub id: InventoryId,
    pub stockist_id: UserId,
    pub beverage_id: BeverageId,
    pub quantity: u32,
    pub updated_at: DateTime<Utc>,
}

/// Inventory row joined with its catalog entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    #[serde(flatten)]
    pub row: StockistInventory,
    pub beverage: Beverage,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertInventoryRequest {
    /// Required for van sales agents and admins, optional for stockists
    pub stockist_id: Option<UserId>,
    pub beverage_id: BeverageId,
    #[validate(range(min = 0, max = 1_000_000, message = "quantity must be between 0 and 1000000"))]
    pub quantity: i64,
}
