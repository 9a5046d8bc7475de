//! Domain events
//!
//! Workflows publish a [`MarketEvent`] after each committed write. The bus
//! is a `tokio::sync::broadcast` channel, so publishing never blocks and
//! in-process observers (the event logger, tests) subscribe independently.
//!
//! ```text
//! OrderWorkflow ──┐
//! ReceiptIssuer ──┼──▶ EventBus::publish() ──▶ broadcast channel ──▶ subscribers
//! InventoryTracker┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::core::auth::UserType;
use crate::core::ids::{BeverageId, OrderId, ReceiptId, UserId};
use crate::core::status::OrderStatus;

/// Something that happened in the marketplace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketEvent {
    UserRegistered {
        user_id: UserId,
        user_type: UserType,
    },
    OrderPlaced {
        order_id: OrderId,
        order_number: String,
        customer_id: UserId,
        total: Decimal,
    },
    OrderStatusChanged {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
        stockist_id: Option<UserId>,
    },
    ReceiptIssued {
        receipt_id: ReceiptId,
        order_id: OrderId,
        receipt_number: String,
    },
    InventoryUpdated {
        stockist_id: UserId,
        beverage_id: BeverageId,
        quantity: u32,
    },
}

impl MarketEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            MarketEvent::UserRegistered { .. } => "user_registered",
            MarketEvent::OrderPlaced { .. } => "order_placed",
            MarketEvent::OrderStatusChanged { .. } => "order_status_changed",
            MarketEvent::ReceiptIssued { .. } => "receipt_issued",
            MarketEvent::InventoryUpdated { .. } => "inventory_updated",
        }
    }

    /// The order this event concerns, if any
    pub fn order_id(&self) -> Option<OrderId> {
        match self {
            MarketEvent::OrderPlaced { order_id, .. }
            | MarketEvent::OrderStatusChanged { order_id, .. }
            | MarketEvent::ReceiptIssued { order_id, .. } => Some(*order_id),
            MarketEvent::UserRegistered { .. } | MarketEvent::InventoryUpdated { .. } => None,
        }
    }
}

/// Event plus delivery metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: MarketEvent,
}

impl EventEnvelope {
    pub fn new(event: MarketEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone; clones publish to the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// `capacity` is how many events a slow receiver may fall behind before
    /// it starts seeing `Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish to all current subscribers; returns how many will receive it.
    pub fn publish(&self, event: MarketEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        // send() only fails when nobody is subscribed
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Receive every event published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Log every event at debug level until the bus is dropped
    pub fn spawn_logger(&self) -> JoinHandle<()> {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(envelope) => {
                        tracing::debug!(
                            event_id = %envelope.id,
                            kind = envelope.event.kind(),
                            "{}",
                            serde_json::to_string(&envelope.event).unwrap_or_default()
                        );
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("Event logger lagged, skipped {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
