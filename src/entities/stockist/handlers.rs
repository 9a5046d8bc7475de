use axum::{extract::State, response::Json};
use std::sync::Arc;

use super::matching::{NearbyStockist, StockistMatcher};
use crate::core::auth::UserType;
use crate::core::error::MarketResult;
use crate::core::service::MarketStore;

#[derive(Clone)]
pub struct StockistAppState {
    pub store: Arc<dyn MarketStore>,
    pub matcher: Arc<dyn StockistMatcher>,
}

/// Public: every stockist with a quote, closest first
pub async fn nearby_stockists(
    State(state): State<StockistAppState>,
) -> MarketResult<Json<Vec<NearbyStockist>>> {
    let stockists = state.store.list_users_by_type(UserType::Stockist).await?;
    Ok(Json(state.matcher.rank(stockists)))
}
