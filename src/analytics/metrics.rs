//! Market microstructure metrics computed from snapshots and trades.
//!
//! Everything here is reporting-grade output: values are `f64` and never
//! feed back into the matching path.

use crate::order::{Side, Trade};
use crate::orderbook::BookSnapshot;
use serde::Serialize;

/// Depth levels per side used for the depth metrics.
const DEPTH_LEVELS: usize = 5;

/// Container for computed microstructure metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MicrostructureMetrics {
    /// Mean bid-ask spread over snapshots where both sides existed.
    pub mean_spread: f64,
    pub median_spread: f64,
    pub spread_volatility: f64,

    /// Mean top-5 depth per side.
    pub mean_depth_bid: f64,
    pub mean_depth_ask: f64,
    /// (bid depth − ask depth) / total depth, in [−1, 1].
    pub depth_imbalance: f64,

    /// Mean top-of-book imbalance across snapshots.
    pub order_flow_imbalance: f64,

    /// Volume where the aggressor was a buyer.
    pub buy_volume: f64,
    /// Volume where the aggressor was a seller.
    pub sell_volume: f64,

    pub num_trades: usize,
    pub total_volume: f64,
    /// Volume-weighted average trade price; `None` without trades.
    pub vwap: Option<f64>,

    /// Mean of log returns of the snapshot mid.
    pub returns_mean: f64,
    /// Stddev of log returns of the snapshot mid.
    pub returns_std: f64,
    /// returns_std scaled by √(number of returns).
    pub realized_volatility: f64,
}

impl MicrostructureMetrics {
    /// Compute the full metric set from a snapshot series and trade history.
    pub fn compute(snapshots: &[BookSnapshot], trades: &[Trade]) -> Self {
        let spreads: Vec<f64> = snapshots
            .iter()
            .filter_map(|s| s.spread())
            .map(|p| p.as_f64())
            .collect();

        let bid_depths: Vec<f64> = snapshots
            .iter()
            .filter(|s| !s.bids.is_empty())
            .map(|s| s.bid_depth(DEPTH_LEVELS).as_f64())
            .collect();
        let ask_depths: Vec<f64> = snapshots
            .iter()
            .filter(|s| !s.asks.is_empty())
            .map(|s| s.ask_depth(DEPTH_LEVELS).as_f64())
            .collect();

        let mean_depth_bid = mean(&bid_depths);
        let mean_depth_ask = mean(&ask_depths);
        let total_depth = mean_depth_bid + mean_depth_ask;
        let depth_imbalance = if total_depth > 0.0 {
            (mean_depth_bid - mean_depth_ask) / total_depth
        } else {
            0.0
        };

        let top_imbalances: Vec<f64> = snapshots
            .iter()
            .filter_map(|s| {
                let bid_volume = s.bids.first().map(|&(_, q)| q.as_f64())?;
                let ask_volume = s.asks.first().map(|&(_, q)| q.as_f64())?;
                let total = bid_volume + ask_volume;
                (total > 0.0).then(|| (bid_volume - ask_volume) / total)
            })
            .collect();

        let buy_volume: f64 = trades
            .iter()
            .filter(|t| t.aggressor_side == Side::Buy)
            .map(|t| t.quantity.as_f64())
            .sum();
        let sell_volume: f64 = trades
            .iter()
            .filter(|t| t.aggressor_side == Side::Sell)
            .map(|t| t.quantity.as_f64())
            .sum();
        let total_volume: f64 = trades.iter().map(|t| t.quantity.as_f64()).sum();

        let vwap = if total_volume > 0.0 {
            let notional: f64 = trades
                .iter()
                .map(|t| t.price.as_f64() * t.quantity.as_f64())
                .sum();
            Some(notional / total_volume)
        } else {
            None
        };

        let mids: Vec<f64> = snapshots
            .iter()
            .filter_map(|s| s.mid_price())
            .map(|p| p.as_f64())
            .collect();
        let returns: Vec<f64> = mids
            .windows(2)
            .filter(|w| w[0] > 0.0 && w[1] > 0.0)
            .map(|w| (w[1] / w[0]).ln())
            .collect();
        let returns_mean = mean(&returns);
        let returns_std = std_dev(&returns);
        let realized_volatility = returns_std * (returns.len() as f64).sqrt();

        Self {
            mean_spread: mean(&spreads),
            spread_volatility: std_dev(&spreads),
            median_spread: median(spreads),
            mean_depth_bid,
            mean_depth_ask,
            depth_imbalance,
            order_flow_imbalance: mean(&top_imbalances),
            buy_volume,
            sell_volume,
            num_trades: trades.len(),
            total_volume,
            vwap,
            returns_mean,
            returns_std,
            realized_volatility,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
