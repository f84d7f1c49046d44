//! Passive limit-order posting.

use super::{ExecutionState, ExecutionStrategy, make_child_order, SlicePricing};
use crate::order::{Order, OrderId, Side, TimeInForce};
use crate::orderbook::BookSnapshot;
use crate::units::{Price, Qty};
use tracing::debug;

/// Post resting limit orders inside the spread and reprice as the market
/// moves.
///
/// The strategy keeps a single active GTC order. When the mid moves by more
/// than the reprice threshold relative to the posted price, the stale order
/// id is surfaced through [`ExecutionStrategy::orders_to_cancel`] — the
/// host must cancel it before submitting the replacement, otherwise
/// duplicate resting quantity accumulates.
pub struct PostingStrategy {
    state: ExecutionState,
    /// Position inside the spread: 0 joins the best quote, larger values
    /// post closer to the far side.
    spread_fraction: f64,
    max_order_size: Option<Qty>,
    /// Relative mid move that triggers a reprice.
    reprice_threshold: f64,
    active_order: Option<OrderId>,
    active_remaining: Qty,
    last_post_price: Option<Price>,
    stale_orders: Vec<OrderId>,
}

impl PostingStrategy {
    pub fn new(
        symbol: impl Into<String>,
        side: Side,
        target_quantity: Qty,
        spread_fraction: f64,
        reprice_threshold: f64,
    ) -> Self {
        Self {
            state: ExecutionState::new(symbol, side, target_quantity),
            spread_fraction: spread_fraction.clamp(0.0, 1.0),
            max_order_size: None,
            reprice_threshold,
            active_order: None,
            active_remaining: Qty::ZERO,
            last_post_price: None,
            stale_orders: Vec::new(),
        }
    }

    /// Cap the size of each posted order.
    pub fn with_max_order_size(mut self, size: Qty) -> Self {
        self.max_order_size = Some(size);
        self
    }

    /// Id of the currently posted order, if one is resting.
    pub fn active_order(&self) -> Option<&OrderId> {
        self.active_order.as_ref()
    }

    fn should_reprice(&self, snapshot: &BookSnapshot) -> bool {
        let (Some(last), Some(mid)) = (self.last_post_price, snapshot.mid_price()) else {
            return false;
        };
        if last.is_zero() {
            return false;
        }
        let relative_move = (mid.as_f64() - last.as_f64()).abs() / last.as_f64();
        relative_move > self.reprice_threshold
    }
}

impl ExecutionStrategy for PostingStrategy {
    fn state(&self) -> &ExecutionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ExecutionState {
        &mut self.state
    }

    fn update_execution(&mut self, order_id: &OrderId, fill_price: Price, fill_quantity: Qty) {
        self.state.record_fill(fill_price, fill_quantity);
        if self.active_order.as_ref() == Some(order_id) {
            self.active_remaining = self.active_remaining.saturating_sub(fill_quantity);
            if self.active_remaining.is_zero() {
                // The post is gone from the book; re-arm on the next tick.
                self.active_order = None;
                self.last_post_price = None;
            }
        }
    }

    fn orders_to_cancel(&mut self) -> Vec<OrderId> {
        std::mem::take(&mut self.stale_orders)
    }

    fn generate_orders(&mut self, snapshot: &BookSnapshot, elapsed_secs: f64) -> Vec<Order> {
        if self.is_complete() {
            // Nothing left to work; retire any leftover post.
            if let Some(active) = self.active_order.take() {
                self.stale_orders.push(active);
            }
            return Vec::new();
        }

        if self.active_order.is_some() && !self.should_reprice(snapshot) {
            return Vec::new();
        }

        let (Some(bid), Some(ask)) = (snapshot.best_bid(), snapshot.best_ask()) else {
            return Vec::new(); // cannot post without a two-sided market
        };

        let spread_ticks = ask.ticks().saturating_sub(bid.ticks());
        let offset = (spread_ticks as f64 * self.spread_fraction).round() as u64;
        let target_price = match self.state.side() {
            Side::Buy => Price::from_ticks(bid.ticks().saturating_add(offset)),
            Side::Sell => Price::from_ticks(ask.ticks().saturating_sub(offset)),
        };

        let remaining = self.remaining_quantity();
        let size = match self.max_order_size {
            Some(cap) => cap.min(remaining),
            None => remaining,
        };
        if size.is_zero() {
            return Vec::new();
        }

        if let Some(previous) = self.active_order.take() {
            self.stale_orders.push(previous);
        }

        let timestamp = (elapsed_secs * 1e9) as u64;
        let Some(order) = make_child_order(
            &mut self.state,
            "POST",
            SlicePricing::Limit(target_price),
            size,
            timestamp,
            TimeInForce::Gtc,
        ) else {
            return Vec::new();
        };

        debug!(
            "posting {} {} @ {} (spread fraction {})",
            order.side(),
            order.quantity(),
            target_price,
            self.spread_fraction
        );
        self.active_order = Some(order.id().clone());
        self.active_remaining = size;
        self.last_post_price = Some(target_price);
        vec![order]
    }
}
