//! Order lifecycle state machine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of an order
///
/// ```text
/// placed -> matched -> accepted -> delivering -> delivered -> completed
///              \________________________/
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Placed,
    Matched,
    Accepted,
    Delivering,
    Delivered,
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Placed,
        OrderStatus::Matched,
        OrderStatus::Accepted,
        OrderStatus::Delivering,
        OrderStatus::Delivered,
        OrderStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Matched => "matched",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
        }
    }

    /// Statuses reachable in one step from `self`
    pub fn allowed_next(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Placed => &[OrderStatus::Matched],
            OrderStatus::Matched => &[OrderStatus::Accepted, OrderStatus::Delivering],
            OrderStatus::Accepted => &[OrderStatus::Delivering],
            OrderStatus::Delivering => &[OrderStatus::Delivered],
            OrderStatus::Delivered => &[OrderStatus::Completed],
            OrderStatus::Completed => &[],
        }
    }

    /// Whether the state machine allows `self -> next`
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.allowed_next().contains(&next)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown order status '{}'", s))
    }
}
