//! Event replay: synthetic order-flow generation and the driver loop that
//! pumps events through the matching engine.

mod driver;
mod generator;

pub use driver::{
    OrderListener, ReplayDriver, ReplaySummary, SnapshotListener, StopHandle, TradeListener,
};
pub use generator::{GeneratorConfig, GeneratorError, MarketEvent, PoissonOrderGenerator};
