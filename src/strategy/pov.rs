//! Percentage-of-Volume execution.

use super::{ExecutionState, ExecutionStrategy, make_child_order, slice_pricing};
use crate::order::{Order, Side, TimeInForce};
use crate::orderbook::BookSnapshot;
use crate::units::Qty;
use tracing::debug;

/// Default volume check interval, seconds.
const DEFAULT_CHECK_INTERVAL_SECS: f64 = 5.0;

/// Depth levels per side used when estimating market volume from a
/// snapshot.
const DEPTH_ESTIMATE_LEVELS: usize = 5;

/// POV: participate at a target fraction of market traded volume.
///
/// At each check interval the strategy measures the market volume traded
/// since the last check and sends an IOC child for its participation share.
/// The host feeds real cumulative volume through
/// [`ExecutionStrategy::observe_market_volume`]; without it, volume is
/// estimated from top-of-book depth.
pub struct PovStrategy {
    state: ExecutionState,
    target_participation: f64,
    duration_secs: f64,
    aggression: f64,
    check_interval_secs: f64,
    start_time: Option<f64>,
    last_check_time: f64,
    last_market_volume: Qty,
    external_volume: Option<Qty>,
    minimum_slice: Qty,
}

impl PovStrategy {
    pub fn new(
        symbol: impl Into<String>,
        side: Side,
        target_quantity: Qty,
        target_participation: f64,
        duration_secs: f64,
        aggression: f64,
    ) -> Self {
        Self {
            state: ExecutionState::new(symbol, side, target_quantity),
            target_participation: target_participation.clamp(0.0, 1.0),
            duration_secs,
            aggression,
            check_interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
            start_time: None,
            last_check_time: 0.0,
            last_market_volume: Qty::ZERO,
            external_volume: None,
            minimum_slice: Qty::new(1),
        }
    }

    pub fn with_check_interval(mut self, interval_secs: f64) -> Self {
        self.check_interval_secs = interval_secs;
        self
    }

    /// Rough market-volume proxy when no external feed is supplied: total
    /// depth over the top levels of both sides.
    fn estimate_market_volume(snapshot: &BookSnapshot) -> Qty {
        snapshot.bid_depth(DEPTH_ESTIMATE_LEVELS) + snapshot.ask_depth(DEPTH_ESTIMATE_LEVELS)
    }
}

impl ExecutionStrategy for PovStrategy {
    fn state(&self) -> &ExecutionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ExecutionState {
        &mut self.state
    }

    fn observe_market_volume(&mut self, cumulative_volume: Qty) {
        self.external_volume = Some(cumulative_volume);
    }

    fn generate_orders(&mut self, snapshot: &BookSnapshot, elapsed_secs: f64) -> Vec<Order> {
        let start = *self.start_time.get_or_insert(elapsed_secs);
        let relative = elapsed_secs - start;

        if relative < self.last_check_time + self.check_interval_secs {
            return Vec::new();
        }
        if self.is_complete() || relative >= self.duration_secs {
            return Vec::new();
        }

        let market_volume = self
            .external_volume
            .unwrap_or_else(|| Self::estimate_market_volume(snapshot));
        let volume_delta = market_volume.saturating_sub(self.last_market_volume);
        self.last_market_volume = market_volume;

        if volume_delta.is_zero() {
            self.last_check_time = relative;
            return Vec::new();
        }

        let target_slice =
            Qty::from_f64(volume_delta.as_f64() * self.target_participation);
        let quantity = target_slice.min(self.remaining_quantity());

        if quantity < self.minimum_slice {
            self.last_check_time = relative;
            return Vec::new();
        }

        let Some(pricing) = slice_pricing(self.state.side(), snapshot, self.aggression, None)
        else {
            self.last_check_time = relative;
            return Vec::new();
        };

        let timestamp = (elapsed_secs * 1e9) as u64;
        let Some(order) = make_child_order(
            &mut self.state,
            "POV",
            pricing,
            quantity,
            timestamp,
            TimeInForce::Ioc,
        ) else {
            return Vec::new();
        };

        self.last_check_time = relative;
        debug!(
            "POV slice at t={relative:.1}s: {} {} (market Δv={})",
            order.side(),
            order.quantity(),
            volume_delta
        );
        vec![order]
    }
}
