//! The replay driver: pumps market events through the engine under a
//! selectable time model and fans results out to registered listeners.

use super::generator::{GeneratorConfig, GeneratorError, MarketEvent, PoissonOrderGenerator};
use crate::order::{Order, Trade};
use crate::orderbook::{BookSnapshot, OrderBook};
use crate::units::{Price, Qty};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Invoked after each new-order event with the submitted order and the
/// trades it generated.
pub type OrderListener = Box<dyn FnMut(&Order, &[Trade])>;

/// Invoked once per trade generated by replayed events.
pub type TradeListener = Box<dyn FnMut(&Trade)>;

/// Invoked on each periodic book snapshot.
pub type SnapshotListener = Box<dyn FnMut(&BookSnapshot)>;

/// Cooperative stop flag for a running replay.
///
/// The driver polls the flag at the top of each event iteration, so a stop
/// always observes the engine in a consistent state.
#[derive(Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Totals reported at the end of a replay run.
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    pub orders_processed: u64,
    pub cancels_processed: u64,
    pub total_trades: u64,
    pub total_volume: Qty,
    pub final_mid_price: Option<Price>,
    pub final_spread: Option<Price>,
}

/// Replays market events (synthetic or historical) through the matching
/// engine.
///
/// The speed multiplier selects the time model:
/// - `0.0` — tick-by-tick: events run back-to-back with no waits
/// - `1.0` — real time: sleep until the wall clock reaches each event's
///   simulated timestamp
/// - any other positive value — accelerated (or slowed) by that factor
///
/// Control flow is single-threaded cooperative: every listener runs to
/// completion before the next event is processed.
pub struct ReplayDriver {
    book: Rc<RefCell<OrderBook>>,
    speed_multiplier: f64,
    snapshot_depth: usize,
    order_listeners: Vec<OrderListener>,
    trade_listeners: Vec<TradeListener>,
    snapshot_listeners: Vec<SnapshotListener>,
    stop: StopHandle,
}

impl ReplayDriver {
    /// Create a driver over a shared book with the given speed multiplier.
    pub fn new(book: Rc<RefCell<OrderBook>>, speed_multiplier: f64) -> Self {
        Self {
            book,
            speed_multiplier: speed_multiplier.max(0.0),
            snapshot_depth: 10,
            order_listeners: Vec::new(),
            trade_listeners: Vec::new(),
            snapshot_listeners: Vec::new(),
            stop: StopHandle::default(),
        }
    }

    /// Set the number of levels per side captured in periodic snapshots.
    pub fn with_snapshot_depth(mut self, depth: usize) -> Self {
        self.snapshot_depth = depth;
        self
    }

    /// Register a callback for new-order events.
    pub fn register_order_listener(&mut self, listener: impl FnMut(&Order, &[Trade]) + 'static) {
        self.order_listeners.push(Box::new(listener));
    }

    /// Register a callback for trades generated by replayed events.
    pub fn register_trade_listener(&mut self, listener: impl FnMut(&Trade) + 'static) {
        self.trade_listeners.push(Box::new(listener));
    }

    /// Register a callback for periodic book snapshots.
    pub fn register_snapshot_listener(&mut self, listener: impl FnMut(&BookSnapshot) + 'static) {
        self.snapshot_listeners.push(Box::new(listener));
    }

    /// A handle that stops the replay from a listener (or anywhere else).
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Request a cooperative stop of the running replay.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Generate a synthetic stream and replay it.
    pub fn replay_synthetic(
        &mut self,
        config: GeneratorConfig,
        duration_secs: f64,
        snapshot_interval_secs: f64,
    ) -> Result<ReplaySummary, GeneratorError> {
        let generator = PoissonOrderGenerator::new(config, duration_secs)?;
        Ok(self.replay_events(generator, snapshot_interval_secs))
    }

    /// Replay an arbitrary event stream (historical or synthetic).
    ///
    /// Snapshots fire on the simulated clock every `snapshot_interval_secs`
    /// (pass a non-positive interval to disable them), so tick-by-tick
    /// replays see the same snapshot cadence as timed ones.
    pub fn replay_events(
        &mut self,
        events: impl IntoIterator<Item = MarketEvent>,
        snapshot_interval_secs: f64,
    ) -> ReplaySummary {
        let wall_start = Instant::now();
        let mut orders_processed = 0u64;
        let mut cancels_processed = 0u64;
        let mut next_snapshot_secs = 0.0f64;
        let snapshots_enabled = snapshot_interval_secs > 0.0;

        info!(
            "replay starting: speed={} snapshot_interval={}s",
            self.speed_multiplier, snapshot_interval_secs
        );

        for event in events {
            if self.stop.is_stopped() {
                debug!("replay stopped cooperatively");
                break;
            }

            let sim_secs = event.timestamp() as f64 / 1e9;

            if self.speed_multiplier > 0.0 {
                let target_secs = sim_secs / self.speed_multiplier;
                let elapsed_secs = wall_start.elapsed().as_secs_f64();
                if target_secs > elapsed_secs {
                    std::thread::sleep(Duration::from_secs_f64(target_secs - elapsed_secs));
                }
            }

            match event {
                MarketEvent::New { order } => {
                    let submitted = order.clone();
                    let report = self.book.borrow_mut().add_order(order);
                    orders_processed += 1;
                    for listener in &mut self.order_listeners {
                        listener(&submitted, &report.trades);
                    }
                    for trade in &report.trades {
                        for listener in &mut self.trade_listeners {
                            listener(trade);
                        }
                    }
                }
                MarketEvent::Cancel { order_id, .. } => {
                    self.book.borrow_mut().cancel_order(&order_id);
                    cancels_processed += 1;
                }
            }

            if snapshots_enabled && sim_secs >= next_snapshot_secs {
                let snapshot = self.book.borrow().get_snapshot(self.snapshot_depth);
                for listener in &mut self.snapshot_listeners {
                    listener(&snapshot);
                }
                while next_snapshot_secs <= sim_secs {
                    next_snapshot_secs += snapshot_interval_secs;
                }
            }
        }

        let book = self.book.borrow();
        let summary = ReplaySummary {
            orders_processed,
            cancels_processed,
            total_trades: book.total_trades(),
            total_volume: book.total_volume(),
            final_mid_price: book.mid_price(),
            final_spread: book.spread(),
        };
        info!(
            "replay finished: {} orders, {} cancels, {} trades",
            summary.orders_processed, summary.cancels_processed, summary.total_trades
        );
        summary
    }
}
