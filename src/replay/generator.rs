//! Synthetic order flow generated from stochastic processes.
//!
//! Arrivals follow a Poisson process, order sizes a log-normal, limit
//! offsets an exponential number of ticks around a drifting mid, and the
//! mid itself a Gaussian random walk. The stream is finite (bounded by the
//! configured duration) and fully deterministic under a fixed seed.

use crate::order::{Order, OrderId, Side, TimeInForce};
use crate::units::{Price, Qty};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, LogNormal, Normal};
use std::fmt;

/// Mean limit-price offset from the mid, in ticks.
const MEAN_OFFSET_TICKS: f64 = 5.0;

/// Parameters of the synthetic order-flow model.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Trading symbol stamped on generated orders.
    pub symbol: String,
    /// Initial mid price. The tick size is one basis point of this.
    pub base_price: Price,
    /// Mid-price volatility (stddev as a fraction of price, per unit time).
    pub volatility: f64,
    /// Average order arrivals per second (Poisson λ).
    pub arrival_rate: f64,
    /// Probability that a new order is a market order.
    pub market_order_prob: f64,
    /// Probability that an event cancels an outstanding limit order.
    pub cancel_prob: f64,
    /// RNG seed. Re-running with the same seed replays the same stream.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            symbol: "SYNTH".to_string(),
            base_price: Price::from_ticks(100 * Price::SCALE),
            volatility: 0.02,
            arrival_rate: 10.0,
            market_order_prob: 0.3,
            cancel_prob: 0.2,
            seed: 42,
        }
    }
}

/// Rejected synthetic-generator configuration.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GeneratorError {
    /// A model parameter is outside its valid range.
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::InvalidParameter { name, value } => {
                write!(f, "invalid generator parameter {name}: {value}")
            }
        }
    }
}

impl std::error::Error for GeneratorError {}

/// A single replayable market event.
#[derive(Debug, Clone)]
pub enum MarketEvent {
    /// A new order arriving at the book.
    New {
        /// The order to submit.
        order: Order,
    },
    /// Cancellation of a previously submitted order.
    Cancel {
        /// Id of the order to cancel.
        order_id: OrderId,
        /// Simulated time of the cancellation, nanoseconds.
        timestamp: u64,
    },
}

impl MarketEvent {
    /// Simulated time of the event, nanoseconds.
    pub fn timestamp(&self) -> u64 {
        match self {
            MarketEvent::New { order } => order.timestamp(),
            MarketEvent::Cancel { timestamp, .. } => *timestamp,
        }
    }
}

/// Generates synthetic orders using a Poisson arrival process.
///
/// Implements `Iterator`; the stream ends once the simulated clock passes
/// the configured duration.
pub struct PoissonOrderGenerator {
    symbol: String,
    market_order_prob: f64,
    cancel_prob: f64,

    rng: StdRng,
    inter_arrival: Exp<f64>,
    quantity_dist: LogNormal<f64>,
    offset_ticks: Exp<f64>,
    mid_shock: Normal<f64>,

    /// One basis point of the base price, in whole price units.
    tick_size: f64,
    /// Current mid, in whole price units. Evolves as a random walk.
    current_mid: f64,

    duration_secs: f64,
    elapsed_secs: f64,

    order_seq: u64,
    /// Ids of limit orders emitted and not yet cancelled by this stream.
    open_orders: Vec<OrderId>,
}

impl PoissonOrderGenerator {
    /// Build a generator for `duration_secs` of simulated time.
    pub fn new(config: GeneratorConfig, duration_secs: f64) -> Result<Self, GeneratorError> {
        let invalid = |name: &'static str, value: f64| GeneratorError::InvalidParameter { name, value };

        if !(config.arrival_rate.is_finite() && config.arrival_rate > 0.0) {
            return Err(invalid("arrival_rate", config.arrival_rate));
        }
        if !(config.volatility.is_finite() && config.volatility >= 0.0) {
            return Err(invalid("volatility", config.volatility));
        }
        if !(0.0..=1.0).contains(&config.market_order_prob) {
            return Err(invalid("market_order_prob", config.market_order_prob));
        }
        if !(0.0..=1.0).contains(&config.cancel_prob) {
            return Err(invalid("cancel_prob", config.cancel_prob));
        }
        if config.base_price.is_zero() {
            return Err(invalid("base_price", 0.0));
        }
        if !(duration_secs.is_finite() && duration_secs >= 0.0) {
            return Err(invalid("duration_secs", duration_secs));
        }

        let inter_arrival = Exp::new(config.arrival_rate)
            .map_err(|_| invalid("arrival_rate", config.arrival_rate))?;
        // Sizes ~ ⌈LogNormal(μ=3, σ=1)⌉, mean ≈ 33 units.
        let quantity_dist =
            LogNormal::new(3.0, 1.0).map_err(|_| invalid("quantity_dist", 0.0))?;
        let offset_ticks = Exp::new(1.0 / MEAN_OFFSET_TICKS)
            .map_err(|_| invalid("offset_ticks", MEAN_OFFSET_TICKS))?;
        let shock_std = config.volatility * (1.0 / config.arrival_rate).sqrt();
        let mid_shock =
            Normal::new(0.0, shock_std).map_err(|_| invalid("volatility", config.volatility))?;

        let base = config.base_price.as_f64();
        Ok(Self {
            symbol: config.symbol,
            market_order_prob: config.market_order_prob,
            cancel_prob: config.cancel_prob,
            rng: StdRng::seed_from_u64(config.seed),
            inter_arrival,
            quantity_dist,
            offset_ticks,
            mid_shock,
            tick_size: base * 1e-4,
            current_mid: base,
            duration_secs,
            elapsed_secs: 0.0,
            order_seq: 0,
            open_orders: Vec::new(),
        })
    }

    /// Number of limit orders emitted and not yet cancelled.
    pub fn open_order_count(&self) -> usize {
        self.open_orders.len()
    }

    fn next_order(&mut self, timestamp: u64) -> Option<Order> {
        self.order_seq += 1;
        let order_id = OrderId::from(format!("O{}", self.order_seq));

        let side = if self.rng.random_bool(0.5) {
            Side::Buy
        } else {
            Side::Sell
        };
        let is_market = self.rng.random_bool(self.market_order_prob);

        let quantity = Qty::new((self.quantity_dist.sample(&mut self.rng).ceil() as u64).max(1));
        let owner = format!("trader{}", self.rng.random_range(1..=10));

        if is_market {
            Order::market(order_id, timestamp, side, quantity, owner, TimeInForce::Gtc).ok()
        } else {
            let offset = self.offset_ticks.sample(&mut self.rng).floor() * self.tick_size;
            let raw_price = match side {
                Side::Buy => self.current_mid - offset,
                Side::Sell => self.current_mid + offset,
            };
            let price = Price::from_f64(raw_price.max(self.tick_size))?;
            Order::limit(order_id, timestamp, side, price, quantity, owner, TimeInForce::Gtc).ok()
        }
    }

    fn evolve_mid(&mut self) {
        let shock = self.mid_shock.sample(&mut self.rng);
        self.current_mid *= 1.0 + shock;
        self.current_mid = self.current_mid.max(self.tick_size);
    }
}

impl Iterator for PoissonOrderGenerator {
    type Item = MarketEvent;

    fn next(&mut self) -> Option<MarketEvent> {
        loop {
            self.elapsed_secs += self.inter_arrival.sample(&mut self.rng);
            if self.elapsed_secs >= self.duration_secs {
                return None;
            }
            let timestamp = (self.elapsed_secs * 1e9) as u64;

            let event = if !self.open_orders.is_empty() && self.rng.random_bool(self.cancel_prob) {
                let idx = self.rng.random_range(0..self.open_orders.len());
                let order_id = self.open_orders.swap_remove(idx);
                Some(MarketEvent::Cancel {
                    order_id,
                    timestamp,
                })
            } else {
                self.next_order(timestamp).map(|order| {
                    if order.is_limit() {
                        self.open_orders.push(order.id().clone());
                    }
                    MarketEvent::New { order }
                })
            };

            self.evolve_mid();

            if let Some(event) = event {
                return Some(event);
            }
        }
    }
}
