//! Orders: placement, lifecycle and participant-scoped reads

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod workflow;

pub use descriptor::OrderDescriptor;
pub use model::{
    CreateOrderRequest, NewOrder, NewOrderItem, Order, OrderDetails, OrderItem, OrderItemRequest,
    UpdateStatusRequest,
};
pub use workflow::{OrderWorkflow, ensure_participant};
