//! Time-Weighted Average Price execution.

use super::{ExecutionState, ExecutionStrategy, make_child_order, slice_pricing};
use crate::order::{Order, Side, TimeInForce};
use crate::orderbook::BookSnapshot;
use crate::units::{Price, Qty};
use tracing::debug;

/// TWAP: split the parent order into equal slices at regular intervals.
///
/// Each slice is an IOC child order; aggression above 0.8 sends market
/// orders, lower values price limits inside the spread.
pub struct TwapStrategy {
    state: ExecutionState,
    num_slices: u32,
    aggression: f64,
    slice_quantity: Qty,
    slice_interval_secs: f64,
    start_time: Option<f64>,
    next_slice_time: f64,
    slices_executed: u32,
    /// Limit price used when the book is one-sided and has no mid.
    default_price: Price,
}

impl TwapStrategy {
    pub fn new(
        symbol: impl Into<String>,
        side: Side,
        target_quantity: Qty,
        duration_secs: f64,
        num_slices: u32,
        aggression: f64,
    ) -> Self {
        let num_slices = num_slices.max(1);
        // Ceiling split so an integer target completes within num_slices;
        // the final slice is capped by the remaining quantity.
        let slice_quantity = Qty::new(target_quantity.units().div_ceil(num_slices as u64));
        Self {
            state: ExecutionState::new(symbol, side, target_quantity),
            num_slices,
            aggression,
            slice_quantity,
            slice_interval_secs: duration_secs / num_slices as f64,
            start_time: None,
            next_slice_time: 0.0,
            slices_executed: 0,
            default_price: Price::from_ticks(100 * Price::SCALE),
        }
    }

    /// Override the fallback price used when the book is one-sided.
    pub fn with_default_price(mut self, price: Price) -> Self {
        self.default_price = price;
        self
    }

    pub fn slices_executed(&self) -> u32 {
        self.slices_executed
    }
}

impl ExecutionStrategy for TwapStrategy {
    fn state(&self) -> &ExecutionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ExecutionState {
        &mut self.state
    }

    fn generate_orders(&mut self, snapshot: &BookSnapshot, elapsed_secs: f64) -> Vec<Order> {
        let start = *self.start_time.get_or_insert(elapsed_secs);
        let relative = elapsed_secs - start;

        if relative < self.next_slice_time
            || self.slices_executed >= self.num_slices
            || self.is_complete()
        {
            return Vec::new();
        }

        let quantity = self.slice_quantity.min(self.remaining_quantity());
        if quantity.is_zero() {
            return Vec::new();
        }

        let Some(pricing) = slice_pricing(
            self.state.side(),
            snapshot,
            self.aggression,
            Some(self.default_price),
        ) else {
            return Vec::new();
        };

        let timestamp = (elapsed_secs * 1e9) as u64;
        let Some(order) = make_child_order(
            &mut self.state,
            "TWAP",
            pricing,
            quantity,
            timestamp,
            TimeInForce::Ioc,
        ) else {
            return Vec::new();
        };

        self.slices_executed += 1;
        self.next_slice_time += self.slice_interval_secs;
        debug!(
            "TWAP slice {}/{}: {} {} @ {:?}",
            self.slices_executed,
            self.num_slices,
            order.side(),
            order.quantity(),
            order.price()
        );
        vec![order]
    }
}
