//! Order book snapshot for market data

use crate::units::{Price, Qty};
use serde::{Deserialize, Serialize};

/// A point-in-time, read-only view of the top of the book.
///
/// Snapshots are value copies: mutating the book after taking one never
/// changes its contents, and they can be shared freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// Simulated time of the snapshot, nanoseconds.
    pub timestamp: u64,

    /// Bid levels as (price, aggregate quantity), best first
    /// (decreasing price).
    pub bids: Vec<(Price, Qty)>,

    /// Ask levels as (price, aggregate quantity), best first
    /// (increasing price).
    pub asks: Vec<(Price, Qty)>,

    /// Price of the most recent trade, if any.
    pub last_trade_price: Option<Price>,
}

impl BookSnapshot {
    /// Get the best bid price
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first().map(|&(price, _)| price)
    }

    /// Get the best ask price
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first().map(|&(price, _)| price)
    }

    /// Spread = best ask − best bid; undefined when either side is empty
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }

    /// Mid price, truncated to the tick grid; undefined when one-sided
    pub fn mid_price(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(Price::midpoint(bid, ask)),
            _ => None,
        }
    }

    /// Total bid quantity over the top `depth` levels
    pub fn bid_depth(&self, depth: usize) -> Qty {
        self.bids.iter().take(depth).map(|&(_, qty)| qty).sum()
    }

    /// Total ask quantity over the top `depth` levels
    pub fn ask_depth(&self, depth: usize) -> Qty {
        self.asks.iter().take(depth).map(|&(_, qty)| qty).sum()
    }

    /// Serializes the snapshot to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserializes a snapshot from JSON.
    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }
}
