//! Immutable execution records.

use super::{OrderId, Side};
use crate::units::{Price, Qty, notional_ticks};
use serde::{Deserialize, Serialize};

/// Record of a single execution between two orders.
///
/// The execution price is always the passive (resting) order's limit price;
/// the aggressor side is the side of the order that crossed the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique trade identifier, assigned sequentially by the book.
    pub trade_id: String,
    /// Execution timestamp in nanoseconds.
    pub timestamp: u64,
    /// Id of the buy-side order.
    pub buy_order_id: OrderId,
    /// Id of the sell-side order.
    pub sell_order_id: OrderId,
    /// Execution price (the passive order's limit price).
    pub price: Price,
    /// Executed quantity, always positive.
    pub quantity: Qty,
    /// The side that took liquidity.
    pub aggressor_side: Side,
}

impl Trade {
    pub(crate) fn new(
        trade_id: String,
        timestamp: u64,
        taker_id: &OrderId,
        maker_id: &OrderId,
        taker_side: Side,
        price: Price,
        quantity: Qty,
    ) -> Self {
        let (buy_order_id, sell_order_id) = match taker_side {
            Side::Buy => (taker_id.clone(), maker_id.clone()),
            Side::Sell => (maker_id.clone(), taker_id.clone()),
        };
        Self {
            trade_id,
            timestamp,
            buy_order_id,
            sell_order_id,
            price,
            quantity,
            aggressor_side: taker_side,
        }
    }

    /// Id of the order that was resting when this trade executed.
    pub fn passive_order_id(&self) -> &OrderId {
        match self.aggressor_side {
            Side::Buy => &self.sell_order_id,
            Side::Sell => &self.buy_order_id,
        }
    }

    /// Id of the order that crossed the book.
    pub fn aggressor_order_id(&self) -> &OrderId {
        match self.aggressor_side {
            Side::Buy => &self.buy_order_id,
            Side::Sell => &self.sell_order_id,
        }
    }

    /// Returns true if the given order participated in this trade.
    pub fn involves(&self, order_id: &OrderId) -> bool {
        &self.buy_order_id == order_id || &self.sell_order_id == order_id
    }

    /// Price × quantity in raw tick-units. Exact, for cost accumulation.
    pub fn notional_ticks(&self) -> u128 {
        notional_ticks(self.price, self.quantity)
    }
}
