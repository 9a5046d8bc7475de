//! Order HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use super::model::{CreateOrderRequest, Order, OrderDetails, UpdateStatusRequest};
use super::workflow::OrderWorkflow;
use crate::core::error::MarketResult;
use crate::core::extractors::{RequireUser, parse_id};
use crate::core::ids::OrderId;
use crate::core::validation::ValidatedJson;

pub async fn create_order(
    State(workflow): State<OrderWorkflow>,
    RequireUser(user): RequireUser,
    ValidatedJson(request): ValidatedJson<CreateOrderRequest>,
) -> MarketResult<(StatusCode, Json<Order>)> {
    let order = workflow.place_order(&user, request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list_customer_orders(
    State(workflow): State<OrderWorkflow>,
    RequireUser(user): RequireUser,
) -> MarketResult<Json<Vec<Order>>> {
    Ok(Json(workflow.for_customer(&user).await?))
}

pub async fn list_stockist_orders(
    State(workflow): State<OrderWorkflow>,
    RequireUser(user): RequireUser,
) -> MarketResult<Json<Vec<Order>>> {
    Ok(Json(workflow.for_stockist(&user).await?))
}

pub async fn get_order(
    State(workflow): State<OrderWorkflow>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> MarketResult<Json<OrderDetails>> {
    let id: OrderId = parse_id(&id)?;
    Ok(Json(workflow.details(&user, id).await?))
}

pub async fn update_order_status(
    State(workflow): State<OrderWorkflow>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    ValidatedJson(update): ValidatedJson<UpdateStatusRequest>,
) -> MarketResult<Json<Order>> {
    let id: OrderId = parse_id(&id)?;
    Ok(Json(workflow.update_status(&user, id, update).await?))
}
