use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ids::{OrderId, ReceiptId};

/// VAT receipt, one per completed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VatReceipt {
    pub id: ReceiptId,
    pub order_id: OrderId,
    pub receipt_number: String,
    pub seller_name: String,
    pub seller_tin: String,
    pub buyer_name: String,
    pub buyer_tin: String,
    pub subtotal: Decimal,
    pub vat_amount: Decimal,
    pub total: Decimal,
    /// Snapshot of the order and its lines at issuance
    pub receipt_data: serde_json::Value,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewVatReceipt {
    pub order_id: OrderId,
    pub receipt_number: String,
    pub seller_name: String,
    pub seller_tin: String,
    pub buyer_name: String,
    pub buyer_tin: String,
    pub subtotal: Decimal,
    pub vat_amount: Decimal,
    pub total: Decimal,
    pub receipt_data: serde_json::Value,
}

/// Body of `POST /api/receipts`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IssueReceiptRequest {
    pub order_id: OrderId,
}
