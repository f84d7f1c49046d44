//! Volume-Weighted Average Price execution.

use super::{ExecutionState, ExecutionStrategy, make_child_order, slice_pricing};
use crate::order::{Order, Side, TimeInForce};
use crate::orderbook::BookSnapshot;
use crate::units::Qty;
use tracing::debug;

/// Default slice check interval, seconds.
const DEFAULT_SLICE_INTERVAL_SECS: f64 = 5.0;

/// VWAP: schedule the parent order along a volume profile.
///
/// At each check interval the strategy compares its executed quantity with
/// the profile's cumulative target and sends a single IOC child for the
/// shortfall. The default profile is U-shaped, heavy at the open and close.
pub struct VwapStrategy {
    state: ExecutionState,
    duration_secs: f64,
    aggression: f64,
    /// (time fraction, volume fraction) points, sorted by time fraction.
    volume_profile: Vec<(f64, f64)>,
    slice_interval_secs: f64,
    start_time: Option<f64>,
    last_slice_time: f64,
    /// Shortfalls below this size are left to accumulate.
    minimum_slice: Qty,
}

impl VwapStrategy {
    pub fn new(
        symbol: impl Into<String>,
        side: Side,
        target_quantity: Qty,
        duration_secs: f64,
        aggression: f64,
    ) -> Self {
        Self {
            state: ExecutionState::new(symbol, side, target_quantity),
            duration_secs,
            aggression,
            volume_profile: Self::default_profile(),
            slice_interval_secs: DEFAULT_SLICE_INTERVAL_SECS,
            start_time: None,
            last_slice_time: 0.0,
            minimum_slice: Qty::new(1),
        }
    }

    /// Replace the volume profile. Points are (time fraction, volume
    /// fraction) and are sorted by time fraction.
    pub fn with_profile(mut self, mut profile: Vec<(f64, f64)>) -> Self {
        profile.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.volume_profile = profile;
        self
    }

    pub fn with_slice_interval(mut self, interval_secs: f64) -> Self {
        self.slice_interval_secs = interval_secs;
        self
    }

    /// U-shaped intraday profile: heavier volume at the open and close.
    fn default_profile() -> Vec<(f64, f64)> {
        vec![
            (0.0, 0.15),
            (0.1, 0.15),
            (0.2, 0.10),
            (0.3, 0.08),
            (0.4, 0.07),
            (0.5, 0.06),
            (0.6, 0.07),
            (0.7, 0.08),
            (0.8, 0.10),
            (0.9, 0.14),
            (1.0, 0.0),
        ]
    }

    /// Cumulative volume fraction at `time_fraction`, by piecewise-linear
    /// interpolation of the profile.
    fn cumulative_fraction(&self, time_fraction: f64) -> f64 {
        let mut cumulative = 0.0;
        for window in self.volume_profile.windows(2) {
            let (t1, v1) = window[0];
            let (t2, _) = window[1];
            if time_fraction >= t2 {
                cumulative += v1;
            } else if time_fraction >= t1 {
                cumulative += v1 * (time_fraction - t1) / (t2 - t1);
                break;
            } else {
                break;
            }
        }
        cumulative
    }
}

impl ExecutionStrategy for VwapStrategy {
    fn state(&self) -> &ExecutionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ExecutionState {
        &mut self.state
    }

    fn generate_orders(&mut self, snapshot: &BookSnapshot, elapsed_secs: f64) -> Vec<Order> {
        let start = *self.start_time.get_or_insert(elapsed_secs);
        let relative = elapsed_secs - start;

        if relative < self.last_slice_time + self.slice_interval_secs {
            return Vec::new();
        }
        if self.is_complete() || relative >= self.duration_secs {
            return Vec::new();
        }

        let time_fraction = (relative / self.duration_secs).min(1.0);
        let target_cumulative = Qty::from_f64(
            self.target_quantity().as_f64() * self.cumulative_fraction(time_fraction),
        );
        let shortfall = target_cumulative.saturating_sub(self.executed_quantity());

        if shortfall < self.minimum_slice {
            self.last_slice_time = relative;
            return Vec::new();
        }

        let quantity = shortfall.min(self.remaining_quantity());
        let Some(pricing) = slice_pricing(self.state.side(), snapshot, self.aggression, None)
        else {
            // One-sided book with no mid: skip this tick.
            self.last_slice_time = relative;
            return Vec::new();
        };

        let timestamp = (elapsed_secs * 1e9) as u64;
        let Some(order) = make_child_order(
            &mut self.state,
            "VWAP",
            pricing,
            quantity,
            timestamp,
            TimeInForce::Ioc,
        ) else {
            return Vec::new();
        };

        self.last_slice_time = relative;
        debug!(
            "VWAP slice at t={relative:.1}s: {} {} (cumulative target {})",
            order.side(),
            order.quantity(),
            target_cumulative
        );
        vec![order]
    }
}
