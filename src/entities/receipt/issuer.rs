//! VAT receipt issuance
//!
//! A receipt is issued once per delivered order by its stockist (or an
//! admin). Inserting the receipt and completing the order is a single store
//! write, so an order is never `completed` without a receipt.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::AppConfig;
use crate::core::auth::{AuthContext, AuthPolicy, UserType};
use crate::core::error::{EntityError, MarketError, MarketResult, OrderError};
use crate::core::events::{EventBus, MarketEvent};
use crate::core::extractors::SessionUser;
use crate::core::ids::{OrderId, UserId};
use crate::core::numbering::random_number;
use crate::core::service::MarketStore;
use crate::core::status::OrderStatus;
use crate::entities::order::Order;
use crate::entities::receipt::model::{NewVatReceipt, VatReceipt};
use crate::entities::user::User;

const RECEIPT_NUMBER_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct ReceiptIssuer {
    store: Arc<dyn MarketStore>,
    config: Arc<AppConfig>,
    events: EventBus,
}

impl ReceiptIssuer {
    pub fn new(store: Arc<dyn MarketStore>, config: Arc<AppConfig>, events: EventBus) -> Self {
        Self {
            store,
            config,
            events,
        }
    }

    #[instrument(skip(self), fields(actor_id = %actor.id))]
    pub async fn issue(&self, actor: &SessionUser, order_id: OrderId) -> MarketResult<VatReceipt> {
        let context = actor.context();
        AuthPolicy::role_or_admin(&[UserType::Stockist]).enforce(&context, "issue receipts")?;

        let order = self.load_order(order_id).await?;
        if !context.is_admin() && order.stockist_id != Some(actor.id) {
            return Err(MarketError::forbidden(format!(
                "only the assigned stockist can issue a receipt for order {}",
                order.order_number
            )));
        }

        if self.store.get_receipt_by_order(order.id).await?.is_some() {
            return Err(EntityError::AlreadyExists {
                entity_type: "receipt for order".to_string(),
                key: order.order_number.clone(),
            }
            .into());
        }
        if order.status != OrderStatus::Delivered {
            return Err(OrderError::NotDelivered {
                status: order.status,
            }
            .into());
        }

        let stockist_id = order.stockist_id.ok_or_else(|| {
            MarketError::invalid_field("orderId", "order has no assigned stockist")
        })?;
        let seller = self.load_user(stockist_id).await?;
        let buyer = self.load_user(order.customer_id).await?;

        let seller_tin = non_blank(seller.tin.clone()).ok_or_else(|| {
            MarketError::invalid_field("sellerTin", "the stockist has no TIN on file")
        })?;
        let buyer_tin = non_blank(order.customer_tin.clone())
            .or_else(|| non_blank(buyer.tin.clone()))
            .ok_or_else(|| {
                MarketError::invalid_field("buyerTin", "the customer has no TIN on file")
            })?;

        let items = self.store.list_order_items(order.id).await?;
        let receipt_data = serde_json::json!({
            "order": order,
            "items": items,
        });

        let mut attempt = 0;
        let (receipt, completed) = loop {
            attempt += 1;
            let new_receipt = NewVatReceipt {
                order_id: order.id,
                receipt_number: random_number(
                    &self.config.receipts.number_prefix,
                    self.config.receipts.number_length,
                ),
                seller_name: seller.display_name().to_string(),
                seller_tin: seller_tin.clone(),
                buyer_name: buyer.display_name().to_string(),
                buyer_tin: buyer_tin.clone(),
                subtotal: order.subtotal,
                vat_amount: order.vat_amount,
                total: order.total,
                receipt_data: receipt_data.clone(),
            };
            match self.store.issue_receipt(new_receipt).await {
                Err(MarketError::Entity(EntityError::NumberTaken { number, .. }))
                    if attempt < RECEIPT_NUMBER_ATTEMPTS =>
                {
                    warn!("Receipt number {} already taken, retrying", number);
                }
                other => break other?,
            }
        };

        info!(
            receipt_number = %receipt.receipt_number,
            order_number = %completed.order_number,
            total = %receipt.total,
            "VAT receipt issued, order completed"
        );
        self.events.publish(MarketEvent::ReceiptIssued {
            receipt_id: receipt.id,
            order_id: completed.id,
            receipt_number: receipt.receipt_number.clone(),
        });
        self.events.publish(MarketEvent::OrderStatusChanged {
            order_id: completed.id,
            from: order.status,
            to: completed.status,
            stockist_id: completed.stockist_id,
        });

        Ok(receipt)
    }

    /// Receipt of an order, for its participants, vansales and admins.
    pub async fn for_order(&self, actor: &SessionUser, order_id: OrderId) -> MarketResult<VatReceipt> {
        let order = self.load_order(order_id).await?;
        ensure_can_read(&actor.context(), &order)?;
        self.store
            .get_receipt_by_order(order.id)
            .await?
            .ok_or_else(|| MarketError::not_found("receipt for order", order.id))
    }

    async fn load_order(&self, order_id: OrderId) -> MarketResult<Order> {
        self.store
            .get_order(order_id)
            .await?
            .ok_or_else(|| MarketError::not_found("order", order_id))
    }

    async fn load_user(&self, user_id: UserId) -> MarketResult<User> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| MarketError::not_found("user", user_id))
    }
}

fn ensure_can_read(actor: &AuthContext, order: &Order) -> MarketResult<()> {
    let auditor = AuthPolicy::role_or_admin(&[UserType::Vansales]).check(actor);
    let participant = order.is_participant(actor.user_id);
    if auditor || participant {
        Ok(())
    } else {
        Err(MarketError::forbidden(format!(
            "not allowed to read the receipt of order {}",
            order.order_number
        )))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
