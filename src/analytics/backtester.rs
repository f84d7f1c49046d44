//! Strategy backtesting against synthetic market replay.

use super::metrics::MicrostructureMetrics;
use crate::order::{OrderId, Side, Trade};
use crate::orderbook::{BookSnapshot, OrderBook};
use crate::replay::{GeneratorConfig, GeneratorError, ReplayDriver};
use crate::strategy::ExecutionStrategy;
use crate::units::Qty;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::info;

/// Parameters of a backtest run.
#[derive(Debug, Clone)]
pub struct BacktestConfig {
    /// Simulated duration of the replay, seconds.
    pub duration_secs: f64,
    /// Snapshot cadence on the simulated clock, seconds.
    pub snapshot_interval_secs: f64,
    /// Levels per side captured in each snapshot.
    pub snapshot_depth: usize,
    /// Background order-flow model.
    pub generator: GeneratorConfig,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            duration_secs: 60.0,
            snapshot_interval_secs: 0.5,
            snapshot_depth: 10,
            generator: GeneratorConfig::default(),
        }
    }
}

/// Execution-quality results of a backtest.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestResults {
    pub target_quantity: Qty,
    pub executed_quantity: Qty,
    /// executed / target, in [0, 1].
    pub fill_rate: f64,
    /// Volume-weighted average fill price; `None` without fills.
    pub strategy_vwap: Option<f64>,
    /// Mid price at the first snapshot (the benchmark).
    pub arrival_price: Option<f64>,
    /// Signed cost vs. arrival: positive is worse for the trader's side.
    pub slippage: f64,
    /// Slippage in basis points of the arrival price.
    pub slippage_bps: f64,
    pub num_child_orders: usize,
    pub num_fills: usize,
    /// Mean spread over the observed snapshots.
    pub mean_spread: f64,
    /// Realized volatility of the snapshot mid.
    pub realized_volatility: f64,
}

/// Everything the listeners accumulate during a run.
#[derive(Default, Clone)]
struct RunState {
    snapshots: Vec<BookSnapshot>,
    strategy_trades: Vec<Trade>,
    arrival: Option<BookSnapshot>,
    child_ids: HashSet<OrderId>,
}

/// Backtests execution strategies against a tick-by-tick synthetic replay.
///
/// On each snapshot the strategy is asked for child orders, which are
/// submitted straight into the shared book. Fills are correlated from both
/// directions: trades returned by the strategy's own submissions
/// (aggressive fills) and trades from background flow hitting resting
/// children (passive fills, observed through the driver's trade listener).
pub struct Backtester {
    book: Rc<RefCell<OrderBook>>,
}

impl Backtester {
    pub fn new(book: Rc<RefCell<OrderBook>>) -> Self {
        Self { book }
    }

    /// Run `strategy` against a synthetic replay and score it.
    ///
    /// Returns the strategy (with its final execution state) together with
    /// the computed results.
    pub fn backtest_strategy<S>(
        &mut self,
        strategy: S,
        config: &BacktestConfig,
    ) -> Result<(S, BacktestResults), GeneratorError>
    where
        S: ExecutionStrategy + 'static,
    {
        let strategy = Rc::new(RefCell::new(strategy));
        let run = Rc::new(RefCell::new(RunState::default()));

        let mut driver = ReplayDriver::new(Rc::clone(&self.book), 0.0)
            .with_snapshot_depth(config.snapshot_depth);

        // Passive fills: background flow trading against resting children.
        {
            let strategy = Rc::clone(&strategy);
            let run = Rc::clone(&run);
            driver.register_trade_listener(move |trade| {
                let mut run = run.borrow_mut();
                let child_id = if run.child_ids.contains(&trade.buy_order_id) {
                    Some(trade.buy_order_id.clone())
                } else if run.child_ids.contains(&trade.sell_order_id) {
                    Some(trade.sell_order_id.clone())
                } else {
                    None
                };
                if let Some(child_id) = child_id {
                    strategy
                        .borrow_mut()
                        .update_execution(&child_id, trade.price, trade.quantity);
                    run.strategy_trades.push(trade.clone());
                }
            });
        }

        // Snapshot tick: record state, let the strategy act, submit its
        // children, and correlate the aggressive fills.
        {
            let strategy = Rc::clone(&strategy);
            let run = Rc::clone(&run);
            let book = Rc::clone(&self.book);
            driver.register_snapshot_listener(move |snapshot| {
                let mut run = run.borrow_mut();
                run.snapshots.push(snapshot.clone());
                if run.arrival.is_none() {
                    run.arrival = Some(snapshot.clone());
                }

                let elapsed_secs = snapshot.timestamp as f64 / 1e9;
                let mut strategy = strategy.borrow_mut();
                strategy.observe_market_volume(book.borrow().total_volume());

                let child_orders = strategy.generate_orders(snapshot, elapsed_secs);

                // Stale posts (e.g. a repriced posting order) come out before
                // their replacements go in, so resting quantity never
                // duplicates.
                for stale in strategy.orders_to_cancel() {
                    book.borrow_mut().cancel_order(&stale);
                }

                for order in child_orders {
                    let child_id = order.id().clone();
                    run.child_ids.insert(child_id.clone());
                    let report = book.borrow_mut().add_order(order);
                    for trade in &report.trades {
                        if trade.involves(&child_id) {
                            strategy.update_execution(&child_id, trade.price, trade.quantity);
                            run.strategy_trades.push(trade.clone());
                        }
                    }
                }
            });
        }

        let summary = driver.replay_synthetic(
            config.generator.clone(),
            config.duration_secs,
            config.snapshot_interval_secs,
        )?;
        info!(
            "backtest replay done: {} orders, {} trades",
            summary.orders_processed, summary.total_trades
        );

        // Dropping the driver releases the listener clones, leaving these
        // Rcs unique again.
        drop(driver);
        let run = match Rc::try_unwrap(run) {
            Ok(cell) => cell.into_inner(),
            Err(shared) => shared.borrow().clone(),
        };
        let strategy = match Rc::try_unwrap(strategy) {
            Ok(cell) => cell.into_inner(),
            Err(_) => unreachable!("strategy still shared after the driver was dropped"),
        };

        let results = self.compute_results(&strategy, &run);
        Ok((strategy, results))
    }

    fn compute_results<S: ExecutionStrategy>(
        &self,
        strategy: &S,
        run: &RunState,
    ) -> BacktestResults {
        let target = strategy.target_quantity();
        let executed = strategy.executed_quantity();
        let fill_rate = if target.is_zero() {
            0.0
        } else {
            executed.as_f64() / target.as_f64()
        };

        let strategy_vwap = strategy.average_price();
        let arrival_price = run
            .arrival
            .as_ref()
            .and_then(|s| s.mid_price())
            .map(|p| p.as_f64());

        let (slippage, slippage_bps) = match (strategy_vwap, arrival_price) {
            (Some(vwap), Some(arrival)) if arrival > 0.0 => {
                let signed = match strategy.side() {
                    Side::Buy => vwap - arrival,
                    Side::Sell => arrival - vwap,
                };
                (signed, signed / arrival * 10_000.0)
            }
            _ => (0.0, 0.0),
        };

        let (mean_spread, realized_volatility) = if run.snapshots.len() > 1 {
            let metrics =
                MicrostructureMetrics::compute(&run.snapshots, self.book.borrow().trades());
            (metrics.mean_spread, metrics.realized_volatility)
        } else {
            (0.0, 0.0)
        };

        BacktestResults {
            target_quantity: target,
            executed_quantity: executed,
            fill_rate,
            strategy_vwap,
            arrival_price,
            slippage,
            slippage_bps,
            num_child_orders: strategy.state().child_orders().len(),
            num_fills: run.strategy_trades.len(),
            mean_spread,
            realized_volatility,
        }
    }
}
