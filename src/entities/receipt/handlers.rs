//! Receipt HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use super::issuer::ReceiptIssuer;
use super::model::{IssueReceiptRequest, VatReceipt};
use crate::core::error::MarketResult;
use crate::core::extractors::{RequireUser, parse_id};
use crate::core::ids::OrderId;
use crate::core::validation::ValidatedJson;

pub async fn issue_receipt(
    State(issuer): State<ReceiptIssuer>,
    RequireUser(user): RequireUser,
    ValidatedJson(request): ValidatedJson<IssueReceiptRequest>,
) -> MarketResult<(StatusCode, Json<VatReceipt>)> {
    let receipt = issuer.issue(&user, request.order_id).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn get_receipt_for_order(
    State(issuer): State<ReceiptIssuer>,
    RequireUser(user): RequireUser,
    Path(order_id): Path<String>,
) -> MarketResult<Json<VatReceipt>> {
    let order_id: OrderId = parse_id(&order_id)?;
    Ok(Json(issuer.for_order(&user, order_id).await?))
}
