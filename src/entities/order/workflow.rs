//! Order placement and lifecycle

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::AppConfig;
use crate::core::auth::{AuthContext, AuthPolicy, UserType};
use crate::core::error::{EntityError, MarketError, MarketResult, OrderError};
use crate::core::events::{EventBus, MarketEvent};
use crate::core::extractors::SessionUser;
use crate::core::ids::{OrderId, UserId};
use crate::core::money::{OrderTotals, approx_eq, line_subtotal};
use crate::core::numbering::random_number;
use crate::core::service::{CatalogRepository, MarketStore, UserRepository};
use crate::core::status::OrderStatus;
use crate::entities::order::model::{
    CreateOrderRequest, NewOrder, NewOrderItem, Order, OrderDetails, UpdateStatusRequest,
};

/// Attempts at drawing an unused order number before giving up
const ORDER_NUMBER_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct OrderWorkflow {
    store: Arc<dyn MarketStore>,
    config: Arc<AppConfig>,
    events: EventBus,
}

impl OrderWorkflow {
    pub fn new(store: Arc<dyn MarketStore>, config: Arc<AppConfig>, events: EventBus) -> Self {
        Self {
            store,
            config,
            events,
        }
    }

    /// Place an order for `actor`.
    ///
    /// Prices come from the catalog; client-submitted amounts are only
    /// checked against the computed ones.
    #[instrument(skip(self, request), fields(customer_id = %actor.id, items = request.items.len()))]
    pub async fn place_order(
        &self,
        actor: &SessionUser,
        request: CreateOrderRequest,
    ) -> MarketResult<Order> {
        AuthPolicy::role_or_admin(&[UserType::Business])
            .enforce(&actor.context(), "place orders")?;

        let customer = self
            .store
            .get_user(actor.id)
            .await?
            .ok_or_else(|| MarketError::not_found("user", actor.id))?;

        let tolerance = self.config.orders.totals_tolerance;
        let mut items = Vec::with_capacity(request.items.len());
        for (index, line) in request.items.iter().enumerate() {
            let beverage = self
                .store
                .get_beverage(line.beverage_id)
                .await?
                .ok_or_else(|| {
                    MarketError::invalid_field(
                        &format!("items[{}].beverageId", index),
                        format!("beverage {} does not exist", line.beverage_id),
                    )
                })?;

            let subtotal = line_subtotal(line.quantity, beverage.unit_price);
            check_echo(
                &format!("items[{}].unitPrice", index),
                line.unit_price,
                beverage.unit_price,
                tolerance,
            )?;
            check_echo(
                &format!("items[{}].subtotal", index),
                line.subtotal,
                subtotal,
                tolerance,
            )?;

            items.push(NewOrderItem {
                beverage_id: beverage.id,
                quantity: line.quantity,
                unit_price: beverage.unit_price,
                subtotal,
            });
        }

        let delivery_fee = request
            .delivery_fee
            .unwrap_or(self.config.orders.default_delivery_fee);
        if delivery_fee < Decimal::ZERO {
            return Err(MarketError::invalid_field(
                "deliveryFee",
                "delivery fee must not be negative",
            ));
        }

        let totals = OrderTotals::compute(
            items.iter().map(|item| (item.quantity, item.unit_price)),
            self.config.tax.vat_rate,
            delivery_fee,
        );
        check_echo("subtotal", request.subtotal, totals.subtotal, tolerance)?;
        check_echo("vatAmount", request.vat_amount, totals.vat_amount, tolerance)?;
        check_echo("total", request.total, totals.total, tolerance)?;

        let customer_tin = request.customer_tin.or(customer.tin);
        let delivery_time = request.delivery_time.filter(|t| !t.trim().is_empty());

        let mut attempt = 0;
        let (order, items) = loop {
            attempt += 1;
            let new_order = NewOrder {
                order_number: random_number(
                    &self.config.orders.number_prefix,
                    self.config.orders.number_length,
                ),
                customer_id: customer.id,
                delivery_address: request.delivery_address.trim().to_string(),
                totals,
                customer_tin: customer_tin.clone(),
                delivery_time: delivery_time.clone(),
            };
            match self
                .store
                .create_order_with_items(new_order, items.clone())
                .await
            {
                Err(MarketError::Entity(EntityError::NumberTaken { number, .. }))
                    if attempt < ORDER_NUMBER_ATTEMPTS =>
                {
                    warn!("Order number {} already taken, retrying", number);
                }
                other => break other?,
            }
        };

        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            total = %order.total,
            "Order placed with {} items",
            items.len()
        );
        self.events.publish(MarketEvent::OrderPlaced {
            order_id: order.id,
            order_number: order.order_number.clone(),
            customer_id: order.customer_id,
            total: order.total,
        });

        Ok(order)
    }

    /// Move an order along its lifecycle.
    #[instrument(skip(self, update), fields(actor_id = %actor.id, next = %update.status))]
    pub async fn update_status(
        &self,
        actor: &SessionUser,
        order_id: OrderId,
        update: UpdateStatusRequest,
    ) -> MarketResult<Order> {
        let order = self.load(order_id).await?;
        ensure_participant(&actor.context(), &order)?;

        let next = update.status;
        if next == OrderStatus::Completed {
            return Err(OrderError::CompletionRequiresReceipt.into());
        }
        if !order.status.can_transition_to(next) {
            warn!(
                "Rejected transition of order {} from {} to {}",
                order.id, order.status, next
            );
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: next,
            }
            .into());
        }

        let stockist_id = match (next, update.stockist_id) {
            (OrderStatus::Matched, Some(stockist_id)) => {
                self.ensure_stockist(stockist_id).await?;
                Some(stockist_id)
            }
            (OrderStatus::Matched, None) => {
                return Err(MarketError::invalid_field(
                    "stockistId",
                    "a stockist is required to match an order",
                ));
            }
            (_, Some(_)) => {
                return Err(MarketError::invalid_field(
                    "stockistId",
                    "a stockist can only be assigned when matching",
                ));
            }
            (_, None) => None,
        };

        let updated = self
            .store
            .update_order_status(order.id, order.status, next, stockist_id)
            .await?;

        info!(
            "Order {} status updated from '{}' to '{}'",
            updated.order_number, order.status, updated.status
        );
        self.events.publish(MarketEvent::OrderStatusChanged {
            order_id: updated.id,
            from: order.status,
            to: updated.status,
            stockist_id: updated.stockist_id,
        });

        Ok(updated)
    }

    /// Order with its items, for participants and admins.
    pub async fn details(&self, actor: &SessionUser, order_id: OrderId) -> MarketResult<OrderDetails> {
        let order = self.load(order_id).await?;
        ensure_participant(&actor.context(), &order)?;
        let items = self.store.list_order_items(order.id).await?;
        Ok(OrderDetails { order, items })
    }

    /// Orders the caller placed, newest first.
    pub async fn for_customer(&self, actor: &SessionUser) -> MarketResult<Vec<Order>> {
        self.store.list_orders_by_customer(actor.id).await
    }

    /// Orders assigned to the calling stockist, newest first.
    pub async fn for_stockist(&self, actor: &SessionUser) -> MarketResult<Vec<Order>> {
        AuthPolicy::HasRole(vec![UserType::Stockist])
            .enforce(&actor.context(), "list stockist orders")?;
        self.store.list_orders_by_stockist(actor.id).await
    }

    async fn load(&self, order_id: OrderId) -> MarketResult<Order> {
        self.store
            .get_order(order_id)
            .await?
            .ok_or_else(|| MarketError::not_found("order", order_id))
    }

    async fn ensure_stockist(&self, user_id: UserId) -> MarketResult<()> {
        match self.store.get_user(user_id).await? {
            Some(user) if user.user_type == UserType::Stockist => Ok(()),
            _ => Err(MarketError::invalid_field(
                "stockistId",
                format!("user {} is not a stockist", user_id),
            )),
        }
    }
}

/// 403 unless the caller is the customer, the assigned stockist or an admin
pub fn ensure_participant(actor: &AuthContext, order: &Order) -> MarketResult<()> {
    let allowed = actor.is_admin() || order.is_participant(actor.user_id);
    if allowed {
        Ok(())
    } else {
        Err(MarketError::forbidden(format!(
            "not a participant of order {}",
            order.order_number
        )))
    }
}

fn check_echo(
    field: &str,
    submitted: Option<Decimal>,
    computed: Decimal,
    tolerance: Decimal,
) -> MarketResult<()> {
    match submitted {
        Some(submitted) if !approx_eq(submitted, computed, tolerance) => {
            Err(OrderError::TotalsMismatch {
                field: field.to_string(),
                submitted,
                computed,
            }
            .into())
        }
        _ => Ok(()),
    }
}
