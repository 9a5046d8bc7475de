//! Catalog HTTP handlers

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use std::sync::Arc;

use super::model::{Beverage, CatalogQuery};
use crate::core::error::{MarketError, MarketResult};
use crate::core::extractors::parse_id;
use crate::core::ids::BeverageId;
use crate::core::service::{CatalogRepository, MarketStore};

#[derive(Clone)]
pub struct CatalogAppState {
    pub store: Arc<dyn MarketStore>,
}

pub async fn list_beverages(
    State(state): State<CatalogAppState>,
    Query(query): Query<CatalogQuery>,
) -> MarketResult<Json<Vec<Beverage>>> {
    let beverages = match query.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => {
            state.store.list_beverages_by_category(category).await?
        }
        _ => state.store.list_beverages().await?,
    };
    Ok(Json(beverages))
}

pub async fn get_beverage(
    State(state): State<CatalogAppState>,
    Path(id): Path<String>,
) -> MarketResult<Json<Beverage>> {
    let id: BeverageId = parse_id(&id)?;
    state
        .store
        .get_beverage(id)
        .await?
        .map(Json)
        .ok_or_else(|| MarketError::not_found("beverage", id))
}
