//! The order type itself: validated construction and fill lifecycle.

use super::{OrderId, OrderKind, OrderStatus, Side, TimeInForce};
use crate::errors::OrderError;
use crate::units::{Price, Qty};
use serde::{Deserialize, Serialize};

/// A single order submitted to the matching engine.
///
/// Orders are validated at construction, so the book never sees a limit
/// order without a price, a market order with one, or a zero quantity.
/// Fields are private; the book mutates the fill state through crate-level
/// methods and everything else reads through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    /// Creation time in nanoseconds. Informational: queue position, not
    /// this field, is the authoritative time priority.
    timestamp: u64,
    side: Side,
    kind: OrderKind,
    price: Option<Price>,
    quantity: Qty,
    remaining_quantity: Qty,
    owner: String,
    time_in_force: TimeInForce,
    status: OrderStatus,
}

impl Order {
    /// Validated constructor covering both order kinds.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: OrderId,
        timestamp: u64,
        side: Side,
        kind: OrderKind,
        price: Option<Price>,
        quantity: Qty,
        owner: impl Into<String>,
        time_in_force: TimeInForce,
    ) -> Result<Self, OrderError> {
        match (kind, price) {
            (OrderKind::Limit, None) => return Err(OrderError::MissingPrice),
            (OrderKind::Limit, Some(p)) if p.is_zero() => return Err(OrderError::InvalidPrice),
            (OrderKind::Market, Some(_)) => return Err(OrderError::UnexpectedPrice),
            _ => {}
        }
        if quantity.is_zero() {
            return Err(OrderError::InvalidQuantity);
        }
        Ok(Self {
            id,
            timestamp,
            side,
            kind,
            price,
            quantity,
            remaining_quantity: quantity,
            owner: owner.into(),
            time_in_force,
            status: OrderStatus::New,
        })
    }

    /// Limit-order shorthand.
    pub fn limit(
        id: OrderId,
        timestamp: u64,
        side: Side,
        price: Price,
        quantity: Qty,
        owner: impl Into<String>,
        time_in_force: TimeInForce,
    ) -> Result<Self, OrderError> {
        Self::new(
            id,
            timestamp,
            side,
            OrderKind::Limit,
            Some(price),
            quantity,
            owner,
            time_in_force,
        )
    }

    /// Market-order shorthand.
    pub fn market(
        id: OrderId,
        timestamp: u64,
        side: Side,
        quantity: Qty,
        owner: impl Into<String>,
        time_in_force: TimeInForce,
    ) -> Result<Self, OrderError> {
        Self::new(
            id,
            timestamp,
            side,
            OrderKind::Market,
            None,
            quantity,
            owner,
            time_in_force,
        )
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn kind(&self) -> OrderKind {
        self.kind
    }

    pub fn price(&self) -> Option<Price> {
        self.price
    }

    /// The originally submitted quantity.
    pub fn quantity(&self) -> Qty {
        self.quantity
    }

    /// The still-unfilled quantity.
    pub fn remaining_quantity(&self) -> Qty {
        self.remaining_quantity
    }

    /// Quantity executed so far.
    pub fn filled_quantity(&self) -> Qty {
        self.quantity.saturating_sub(self.remaining_quantity)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_buy(&self) -> bool {
        self.side == Side::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.side == Side::Sell
    }

    pub fn is_limit(&self) -> bool {
        self.kind == OrderKind::Limit
    }

    pub fn is_market(&self) -> bool {
        self.kind == OrderKind::Market
    }

    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    /// Execute a partial or full fill against this order.
    pub(crate) fn fill(&mut self, quantity: Qty) {
        debug_assert!(
            quantity <= self.remaining_quantity,
            "fill {} exceeds remaining {}",
            quantity,
            self.remaining_quantity
        );
        self.remaining_quantity = self.remaining_quantity.saturating_sub(quantity);
        if self.remaining_quantity.is_zero() {
            self.status = OrderStatus::Filled;
        } else if self.status == OrderStatus::New {
            self.status = OrderStatus::PartialFill;
        }
    }

    pub(crate) fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }

    /// Replace the original and remaining quantity. Only meaningful while
    /// the order has no fills; the book enforces that.
    pub(crate) fn resize(&mut self, quantity: Qty) {
        self.quantity = quantity;
        self.remaining_quantity = quantity;
    }
}
