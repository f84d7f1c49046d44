//! Replay a synthetic market tick-by-tick, watching snapshots and trades
//! stream past, then dump the snapshot series to CSV.

use lobsim::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

fn main() {
    tracing_subscriber::fmt::init();
    info!("=== Market Replay Demo ===");

    let book = Rc::new(RefCell::new(OrderBook::new("SYNTH/USD")));
    let mut driver = ReplayDriver::new(Rc::clone(&book), 0.0);

    let snapshots = Rc::new(RefCell::new(Vec::new()));
    {
        let snapshots = Rc::clone(&snapshots);
        driver.register_snapshot_listener(move |snapshot| {
            info!(
                "t={:.1}s  bid {:?} ask {:?} last {:?}",
                snapshot.timestamp as f64 / 1e9,
                snapshot.best_bid().map(|p| p.to_string()),
                snapshot.best_ask().map(|p| p.to_string()),
                snapshot.last_trade_price.map(|p| p.to_string()),
            );
            snapshots.borrow_mut().push(snapshot.clone());
        });
    }

    let trade_count = Rc::new(RefCell::new(0u64));
    {
        let trade_count = Rc::clone(&trade_count);
        driver.register_trade_listener(move |_| *trade_count.borrow_mut() += 1);
    }

    let config = GeneratorConfig {
        symbol: "SYNTH/USD".to_string(),
        arrival_rate: 100.0,
        ..GeneratorConfig::default()
    };
    let summary = match driver.replay_synthetic(config, 30.0, 1.0) {
        Ok(summary) => summary,
        Err(error) => {
            info!("replay refused: {error}");
            return;
        }
    };

    info!(
        "replayed {} orders / {} cancels, {} trades for volume {}",
        summary.orders_processed,
        summary.cancels_processed,
        summary.total_trades,
        summary.total_volume
    );
    info!(
        "final mid {:?}, spread {:?}, trades seen by listener: {}",
        summary.final_mid_price.map(|p| p.to_string()),
        summary.final_spread.map(|p| p.to_string()),
        trade_count.borrow()
    );

    let out = std::env::temp_dir().join("lobsim_replay_snapshots.csv");
    match save_snapshots_csv(&snapshots.borrow(), &out, 10) {
        Ok(()) => info!("snapshot series written to {}", out.display()),
        Err(error) => info!("could not write snapshots: {error}"),
    }
}
