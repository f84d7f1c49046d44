//! Execution strategies: schedule a parent order into child orders against
//! the live book.
//!
//! A strategy consumes periodic book snapshots and emits child orders; its
//! execution state is updated externally whenever one of its children
//! trades. TWAP slices by time, VWAP by a volume profile, POV by observed
//! market volume, and the posting strategy rests passively inside the
//! spread.

mod posting;
mod pov;
mod twap;
mod vwap;

pub use posting::PostingStrategy;
pub use pov::PovStrategy;
pub use twap::TwapStrategy;
pub use vwap::VwapStrategy;

use crate::order::{Order, OrderId, Side, TimeInForce};
use crate::orderbook::BookSnapshot;
use crate::units::{Price, Qty, notional_ticks};

/// Shared execution state of a parent order being worked by a strategy.
#[derive(Debug, Clone)]
pub struct ExecutionState {
    symbol: String,
    side: Side,
    target_quantity: Qty,
    executed_quantity: Qty,
    /// Σ price × quantity over fills, in raw tick-units. Exact.
    total_cost_ticks: u128,
    child_orders: Vec<OrderId>,
    child_seq: u64,
}

impl ExecutionState {
    pub fn new(symbol: impl Into<String>, side: Side, target_quantity: Qty) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            target_quantity,
            executed_quantity: Qty::ZERO,
            total_cost_ticks: 0,
            child_orders: Vec::new(),
            child_seq: 0,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn target_quantity(&self) -> Qty {
        self.target_quantity
    }

    pub fn executed_quantity(&self) -> Qty {
        self.executed_quantity
    }

    /// Quantity still to execute.
    pub fn remaining_quantity(&self) -> Qty {
        self.target_quantity.saturating_sub(self.executed_quantity)
    }

    pub fn is_complete(&self) -> bool {
        self.executed_quantity >= self.target_quantity
    }

    /// Volume-weighted average fill price; `None` before the first fill.
    pub fn average_price(&self) -> Option<f64> {
        if self.executed_quantity.is_zero() {
            return None;
        }
        Some(
            self.total_cost_ticks as f64
                / Price::SCALE as f64
                / self.executed_quantity.as_f64(),
        )
    }

    /// Ids of every child order this strategy has emitted.
    pub fn child_orders(&self) -> &[OrderId] {
        &self.child_orders
    }

    /// Record a fill against one of the children.
    pub fn record_fill(&mut self, fill_price: Price, fill_quantity: Qty) {
        self.executed_quantity += fill_quantity;
        self.total_cost_ticks += notional_ticks(fill_price, fill_quantity);
    }

    pub(crate) fn next_child_id(&mut self, prefix: &str) -> OrderId {
        self.child_seq += 1;
        OrderId::from(format!("{prefix}_{}_{}", self.symbol, self.child_seq))
    }

    pub(crate) fn register_child(&mut self, order_id: OrderId) {
        self.child_orders.push(order_id);
    }
}

/// An execution strategy working a parent order.
///
/// `generate_orders` is called once per snapshot by the backtester;
/// `update_execution` is called whenever one of the strategy's child orders
/// trades, aggressively or passively.
pub trait ExecutionStrategy {
    fn state(&self) -> &ExecutionState;

    fn state_mut(&mut self) -> &mut ExecutionState;

    /// React to a snapshot: return the child orders to submit now.
    /// `elapsed_secs` is simulated time since the replay started.
    fn generate_orders(&mut self, snapshot: &BookSnapshot, elapsed_secs: f64) -> Vec<Order>;

    /// Record a fill on one of this strategy's child orders.
    fn update_execution(&mut self, order_id: &OrderId, fill_price: Price, fill_quantity: Qty) {
        let _ = order_id;
        self.state_mut().record_fill(fill_price, fill_quantity);
    }

    /// Feed the current cumulative market volume (POV uses this; other
    /// strategies ignore it).
    fn observe_market_volume(&mut self, cumulative_volume: Qty) {
        let _ = cumulative_volume;
    }

    /// Child orders the host should cancel before submitting new ones
    /// (a posting strategy surfaces its stale resting order here).
    fn orders_to_cancel(&mut self) -> Vec<OrderId> {
        Vec::new()
    }

    fn side(&self) -> Side {
        self.state().side()
    }

    fn target_quantity(&self) -> Qty {
        self.state().target_quantity()
    }

    fn executed_quantity(&self) -> Qty {
        self.state().executed_quantity()
    }

    fn remaining_quantity(&self) -> Qty {
        self.state().remaining_quantity()
    }

    fn is_complete(&self) -> bool {
        self.state().is_complete()
    }

    fn average_price(&self) -> Option<f64> {
        self.state().average_price()
    }
}

/// How a slice should be priced, derived from the aggression parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SlicePricing {
    Market,
    Limit(Price),
}

/// Aggression-based slice pricing shared by TWAP, VWAP and POV.
///
/// Above 0.8 the slice goes out as a market order. Otherwise it is a limit
/// at `best_bid + aggression × spread` (buys) or `best_ask − aggression ×
/// spread` (sells), rounded to the tick. A one-sided book falls back to
/// `fallback` when given, else the slice is skipped.
pub(crate) fn slice_pricing(
    side: Side,
    snapshot: &BookSnapshot,
    aggression: f64,
    fallback: Option<Price>,
) -> Option<SlicePricing> {
    if aggression > 0.8 {
        return Some(SlicePricing::Market);
    }
    match (snapshot.best_bid(), snapshot.best_ask()) {
        (Some(bid), Some(ask)) => {
            let spread_ticks = ask.ticks().saturating_sub(bid.ticks());
            let offset = (spread_ticks as f64 * aggression).round() as u64;
            let price = match side {
                Side::Buy => Price::from_ticks(bid.ticks().saturating_add(offset)),
                Side::Sell => Price::from_ticks(ask.ticks().saturating_sub(offset)),
            };
            Some(SlicePricing::Limit(price))
        }
        _ => snapshot
            .mid_price()
            .or(fallback)
            .map(SlicePricing::Limit),
    }
}

/// Build a child order for a slice and register it with the state.
/// Returns `None` if the computed price is degenerate (zero).
pub(crate) fn make_child_order(
    state: &mut ExecutionState,
    prefix: &str,
    pricing: SlicePricing,
    quantity: Qty,
    timestamp: u64,
    time_in_force: TimeInForce,
) -> Option<Order> {
    let order_id = state.next_child_id(prefix);
    let side = state.side();
    let owner = format!("{prefix}_STRATEGY");
    let order = match pricing {
        SlicePricing::Market => {
            Order::market(order_id.clone(), timestamp, side, quantity, owner, time_in_force)
        }
        SlicePricing::Limit(price) => Order::limit(
            order_id.clone(),
            timestamp,
            side,
            price,
            quantity,
            owner,
            time_in_force,
        ),
    }
    .ok()?;
    state.register_child(order_id);
    Some(order)
}
