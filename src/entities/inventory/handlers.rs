//! Inventory HTTP handlers

use axum::{
    extract::{Path, State},
    response::Json,
};

use super::model::{InventoryEntry, StockistInventory, UpsertInventoryRequest};
use super::tracker::InventoryTracker;
use crate::core::error::MarketResult;
use crate::core::extractors::{RequireUser, parse_id};
use crate::core::ids::UserId;
use crate::core::validation::ValidatedJson;

pub async fn list_inventory(
    State(tracker): State<InventoryTracker>,
    RequireUser(_user): RequireUser,
    Path(stockist_id): Path<String>,
) -> MarketResult<Json<Vec<InventoryEntry>>> {
    let stockist_id: UserId = parse_id(&stockist_id)?;
    Ok(Json(tracker.inventory_for(stockist_id).await?))
}

pub async fn upsert_inventory(
    State(tracker): State<InventoryTracker>,
    RequireUser(user): RequireUser,
    ValidatedJson(request): ValidatedJson<UpsertInventoryRequest>,
) -> MarketResult<Json<StockistInventory>> {
    Ok(Json(tracker.upsert(&user, request).await?))
}
