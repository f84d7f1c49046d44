//! One-stop import for the common types.
//!
//! ```
//! use lobsim::prelude::*;
//!
//! let book = OrderBook::new("BTC/USD");
//! assert_eq!(book.best_bid(), None);
//! ```

pub use crate::analytics::{BacktestConfig, BacktestResults, Backtester, MicrostructureMetrics};
pub use crate::data::{
    DataError, load_lobster_messages, load_snapshots_csv, load_trades_csv, save_snapshots_csv,
    save_trades_csv,
};
pub use crate::errors::OrderError;
pub use crate::order::{Order, OrderId, OrderKind, OrderStatus, Side, TimeInForce, Trade};
pub use crate::orderbook::{BookSnapshot, ExecutionReport, OrderBook};
pub use crate::price_level::PriceLevel;
pub use crate::replay::{
    GeneratorConfig, GeneratorError, MarketEvent, PoissonOrderGenerator, ReplayDriver,
    ReplaySummary, StopHandle,
};
pub use crate::strategy::{
    ExecutionState, ExecutionStrategy, PostingStrategy, PovStrategy, TwapStrategy, VwapStrategy,
};
pub use crate::units::{Price, Qty};
pub use crate::utils::current_time_nanos;
