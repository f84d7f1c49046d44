//! # lobsim — a market-microstructure simulator
//!
//! A limit order book matching engine with strict price-time (FIFO)
//! priority, together with the synthetic order-flow generator and replay
//! driver that feed it, and an execution-strategy framework (TWAP, VWAP,
//! POV, passive posting) scored by a backtester.
//!
//! ## Components
//!
//! - [`OrderBook`] — two-sided ordered price index with per-price FIFO
//!   queues, an O(1) order-id index for cancel/modify, and the matching
//!   algorithm. `add_order` matches to quiescence and returns an
//!   [`ExecutionReport`] carrying the generated trades.
//! - [`PoissonOrderGenerator`] — stochastic event source with Poisson
//!   arrivals, log-normal sizes and a drifting mid; deterministic under a
//!   fixed seed.
//! - [`ReplayDriver`] — pumps events through the engine tick-by-tick, in
//!   real time, or accelerated, with order/trade/snapshot listeners.
//! - [`ExecutionStrategy`] implementations — [`TwapStrategy`],
//!   [`VwapStrategy`], [`PovStrategy`], [`PostingStrategy`].
//! - [`Backtester`] — runs a strategy against a replay and measures fill
//!   rate, VWAP and slippage against the arrival price.
//!
//! Prices and quantities are exact fixed-point values ([`Price`], [`Qty`]);
//! binary floating point never enters the matching path.
//!
//! ## Example
//!
//! ```
//! use lobsim::prelude::*;
//!
//! let mut book = OrderBook::new("DEMO");
//!
//! let ask = Order::limit(
//!     OrderId::from("S1"),
//!     1,
//!     Side::Sell,
//!     "100".parse().unwrap(),
//!     Qty::new(100),
//!     "maker",
//!     TimeInForce::Gtc,
//! )
//! .unwrap();
//! assert!(book.add_order(ask).trades.is_empty());
//!
//! let bid = Order::limit(
//!     OrderId::from("B1"),
//!     2,
//!     Side::Buy,
//!     "100".parse().unwrap(),
//!     Qty::new(40),
//!     "taker",
//!     TimeInForce::Gtc,
//! )
//! .unwrap();
//! let report = book.add_order(bid);
//! assert_eq!(report.trades.len(), 1);
//! assert_eq!(report.trades[0].quantity, Qty::new(40));
//! assert_eq!(book.best_ask(), Some("100".parse().unwrap()));
//! ```
//!
//! The core is single-threaded cooperative: the replay driver owns the
//! loop, listeners run to completion between events, and no engine
//! operation suspends.

pub mod analytics;
pub mod data;
pub mod errors;
pub mod order;
pub mod orderbook;
pub mod prelude;
pub mod price_level;
pub mod replay;
pub mod strategy;
pub mod units;
mod utils;

pub use analytics::{BacktestConfig, BacktestResults, Backtester, MicrostructureMetrics};
pub use data::DataError;
pub use errors::OrderError;
pub use order::{Order, OrderId, OrderKind, OrderStatus, Side, TimeInForce, Trade};
pub use orderbook::{BookSnapshot, ExecutionReport, OrderBook};
pub use price_level::PriceLevel;
pub use replay::{
    GeneratorConfig, GeneratorError, MarketEvent, PoissonOrderGenerator, ReplayDriver,
    ReplaySummary, StopHandle,
};
pub use strategy::{
    ExecutionState, ExecutionStrategy, PostingStrategy, PovStrategy, TwapStrategy, VwapStrategy,
};
pub use units::{Price, Qty};
pub use utils::current_time_nanos;
