//! Order-model value types: sides, order kinds, time-in-force, lifecycle
//! status, orders and trades.

mod base;
mod order;
mod status;
mod time_in_force;
mod trade;

pub use base::{OrderId, OrderKind, Side};
pub use order::Order;
pub use status::OrderStatus;
pub use time_in_force::TimeInForce;
pub use trade::Trade;
