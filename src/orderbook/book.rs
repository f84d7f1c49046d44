//! Core OrderBook state: price indexes, id index, counters and observables.

use super::snapshot::BookSnapshot;
use crate::order::{Order, OrderId, Side, Trade};
use crate::price_level::PriceLevel;
use crate::units::{Price, Qty};
use std::collections::{BTreeMap, HashMap};

/// A limit order book with strict price-time (FIFO) priority.
///
/// Bids and asks are ordered maps keyed by price, so best-price access and
/// best-first traversal are both O(log P). A separate id index maps every
/// live resting order to its (price, side) location, giving O(1) cancel and
/// modify without scanning levels.
///
/// Matching runs to quiescence inside a single [`OrderBook::add_order`]
/// call: a crossed book is never observable from outside.
pub struct OrderBook {
    /// The symbol or identifier for this order book
    pub(super) symbol: String,

    /// Bid side price levels, keyed by price. Best bid is the last key.
    pub(super) bids: BTreeMap<Price, PriceLevel>,

    /// Ask side price levels, keyed by price. Best ask is the first key.
    pub(super) asks: BTreeMap<Price, PriceLevel>,

    /// Order id → (price, side) for every live resting order. An id is
    /// present here iff the order sits on exactly one level's queue.
    pub(super) order_index: HashMap<OrderId, (Price, Side)>,

    /// Append-only trade history.
    pub(super) trades: Vec<Trade>,

    /// Price of the most recent trade, if any.
    pub(super) last_trade_price: Option<Price>,

    /// Feed for sequential trade ids ("T0", "T1", ...).
    pub(super) trade_seq: u64,

    pub(super) total_orders_received: u64,
    pub(super) total_trades: u64,
    pub(super) total_volume: Qty,

    /// Timestamp of the latest event seen, used to stamp snapshots.
    pub(super) last_event_ns: u64,
}

impl OrderBook {
    /// Create a new order book for the given symbol
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_index: HashMap::new(),
            trades: Vec::new(),
            last_trade_price: None,
            trade_seq: 0,
            total_orders_received: 0,
            total_trades: 0,
            total_volume: Qty::ZERO,
            last_event_ns: 0,
        }
    }

    /// Get the symbol of this order book
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the best bid price, if any
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.last_key_value().map(|(price, _)| *price)
    }

    /// Get the best ask price, if any
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first_key_value().map(|(price, _)| *price)
    }

    /// Get the spread (best ask - best bid)
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }

    /// Get the mid price, truncated to the tick grid
    pub fn mid_price(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(Price::midpoint(bid, ask)),
            _ => None,
        }
    }

    /// Get the last trade price, if any
    pub fn last_trade_price(&self) -> Option<Price> {
        self.last_trade_price
    }

    /// Total number of orders ever submitted to this book
    pub fn total_orders_received(&self) -> u64 {
        self.total_orders_received
    }

    /// Total number of trades executed
    pub fn total_trades(&self) -> u64 {
        self.total_trades
    }

    /// Total quantity traded
    pub fn total_volume(&self) -> Qty {
        self.total_volume
    }

    /// The append-only trade history
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Look up a live resting order by id
    pub fn order(&self, order_id: &OrderId) -> Option<&Order> {
        let (price, side) = self.order_index.get(order_id)?;
        let level = match side {
            Side::Buy => self.bids.get(price),
            Side::Sell => self.asks.get(price),
        }?;
        level.order(order_id)
    }

    /// Whether an order is currently resting on the book
    pub fn contains_order(&self, order_id: &OrderId) -> bool {
        self.order_index.contains_key(order_id)
    }

    /// Number of live resting orders
    pub fn open_order_count(&self) -> usize {
        self.order_index.len()
    }

    pub fn bid_level_count(&self) -> usize {
        self.bids.len()
    }

    pub fn ask_level_count(&self) -> usize {
        self.asks.len()
    }

    /// Aggregate the top `depth` levels per side into a value-copy snapshot.
    ///
    /// O(depth) beyond locating the best levels; never mutates the book, and
    /// the returned snapshot shares nothing with it.
    pub fn get_snapshot(&self, depth: usize) -> BookSnapshot {
        let bids = self
            .bids
            .iter()
            .rev()
            .take(depth)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect();
        let asks = self
            .asks
            .iter()
            .take(depth)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect();
        BookSnapshot {
            timestamp: self.last_event_ns,
            bids,
            asks,
            last_trade_price: self.last_trade_price,
        }
    }

    /// Verify every internal invariant, panicking on the first violation.
    ///
    /// Runs after each mutating operation in debug builds. Invariant
    /// violations are unrecoverable engine bugs, so aborting is the only
    /// correct response.
    pub fn check_invariants(&self) {
        if let (Some(bid), Some(ask)) = (self.best_bid(), self.best_ask()) {
            assert!(bid < ask, "crossed book: best bid {bid} >= best ask {ask}");
        }

        let mut indexed_orders = 0usize;
        for (side, levels) in [(Side::Buy, &self.bids), (Side::Sell, &self.asks)] {
            for (price, level) in levels.iter() {
                assert!(!level.is_empty(), "empty {side} level retained at {price}");
                let mut queued_quantity = Qty::ZERO;
                for order in level.iter_orders() {
                    assert!(
                        !order.remaining_quantity().is_zero(),
                        "fully filled order {} still queued at {price}",
                        order.id()
                    );
                    assert!(
                        order.status().is_active(),
                        "terminal order {} still queued at {price}",
                        order.id()
                    );
                    assert_eq!(order.price(), Some(*price), "order {} priced off-level", order.id());
                    assert_eq!(order.side(), side, "order {} on the wrong side", order.id());
                    assert_eq!(
                        self.order_index.get(order.id()),
                        Some(&(*price, side)),
                        "order {} missing from the id index",
                        order.id()
                    );
                    queued_quantity += order.remaining_quantity();
                    indexed_orders += 1;
                }
                assert_eq!(
                    queued_quantity,
                    level.total_quantity(),
                    "aggregate mismatch at {side} {price}"
                );
            }
        }
        assert_eq!(
            indexed_orders,
            self.order_index.len(),
            "id index references orders absent from every level"
        );
    }
}
