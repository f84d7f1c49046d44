//! Backtest a TWAP execution against synthetic flow at three aggression
//! levels and compare slippage.

use lobsim::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

fn main() {
    tracing_subscriber::fmt::init();
    info!("=== TWAP Backtest Demo ===");

    for aggression in [0.2, 0.5, 1.0] {
        let book = Rc::new(RefCell::new(OrderBook::new("SYNTH/USD")));
        let mut backtester = Backtester::new(book);

        let config = BacktestConfig {
            duration_secs: 60.0,
            snapshot_interval_secs: 0.5,
            snapshot_depth: 10,
            generator: GeneratorConfig {
                symbol: "SYNTH/USD".to_string(),
                arrival_rate: 100.0,
                ..GeneratorConfig::default()
            },
        };
        let twap = TwapStrategy::new(
            "SYNTH/USD",
            Side::Buy,
            Qty::new(1_000),
            config.duration_secs,
            12,
            aggression,
        );

        match backtester.backtest_strategy(twap, &config) {
            Ok((_, results)) => {
                info!("aggression {aggression}:");
                info!(
                    "  filled {}/{} ({:.1}%) over {} children, {} fills",
                    results.executed_quantity,
                    results.target_quantity,
                    results.fill_rate * 100.0,
                    results.num_child_orders,
                    results.num_fills
                );
                info!(
                    "  vwap {:?} vs arrival {:?} -> slippage {:.4} ({:+.2} bps)",
                    results.strategy_vwap,
                    results.arrival_price,
                    results.slippage,
                    results.slippage_bps
                );
                info!(
                    "  ambient mean spread {:.4}, realized vol {:.6}",
                    results.mean_spread, results.realized_volatility
                );
            }
            Err(error) => info!("backtest refused: {error}"),
        }
    }
}
