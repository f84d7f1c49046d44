//! Order book operations like adding, modifying and canceling orders

use super::book::OrderBook;
use super::report::ExecutionReport;
use crate::order::{Order, OrderId, OrderKind, OrderStatus, Side, TimeInForce};
use crate::price_level::PriceLevel;
use crate::units::Qty;
use tracing::trace;

impl OrderBook {
    /// Admit an order: match it immediately under price-time priority,
    /// apply the time-in-force policy, and rest any permitted residual.
    ///
    /// Matching runs to quiescence before this call returns, so no caller
    /// ever observes a crossed book. The report carries the trades this
    /// call generated, in execution order, plus the order's final status:
    ///
    /// - GTC residuals rest on the book (status NEW or PARTIAL_FILL)
    /// - IOC residuals are CANCELLED and never rest
    /// - FOK orders that cannot fill completely are REJECTED with no
    ///   trades at all, decided by a read-only fillability walk up front
    /// - market-order residuals are CANCELLED; an empty opposite side is
    ///   not an error
    pub fn add_order(&mut self, mut order: Order) -> ExecutionReport {
        self.total_orders_received += 1;
        if order.timestamp() > self.last_event_ns {
            self.last_event_ns = order.timestamp();
        }
        trace!(
            "add_order {} {} {} qty={} tif={}",
            order.id(),
            order.side(),
            order.kind(),
            order.quantity(),
            order.time_in_force()
        );

        let mut trades = Vec::new();
        let mut rest_residual = false;

        if self.order_index.contains_key(order.id()) {
            // A live resting order already owns this id; admitting another
            // would alias the id index.
            order.set_status(OrderStatus::Rejected);
        } else {
            match order.kind() {
                OrderKind::Market => {
                    trades = self.match_against(&mut order, None);
                    if !order.remaining_quantity().is_zero() {
                        order.set_status(OrderStatus::Cancelled);
                    }
                }
                OrderKind::Limit => {
                    let limit_price = order.price();
                    if order.time_in_force() == TimeInForce::Fok
                        && !self.is_fully_fillable(order.side(), order.quantity(), limit_price)
                    {
                        order.set_status(OrderStatus::Rejected);
                    } else {
                        trades = self.match_against(&mut order, limit_price);
                        if !order.remaining_quantity().is_zero() {
                            match order.time_in_force() {
                                TimeInForce::Gtc => rest_residual = true,
                                TimeInForce::Ioc | TimeInForce::Fok => {
                                    order.set_status(OrderStatus::Cancelled);
                                }
                            }
                        }
                    }
                }
            }
        }

        for trade in &trades {
            self.total_trades += 1;
            self.total_volume += trade.quantity;
            self.last_trade_price = Some(trade.price);
        }
        self.trades.extend(trades.iter().cloned());

        let report = ExecutionReport {
            order_id: order.id().clone(),
            status: order.status(),
            executed_quantity: order.filled_quantity(),
            remaining_quantity: order.remaining_quantity(),
            trades,
        };

        if rest_residual {
            self.insert_resting(order);
        }

        #[cfg(debug_assertions)]
        self.check_invariants();

        report
    }

    /// Remove a resting order by id.
    ///
    /// Returns `false` for unknown ids and for orders already in a terminal
    /// state; cancelling twice is not an error and leaves the book
    /// untouched.
    pub fn cancel_order(&mut self, order_id: &OrderId) -> bool {
        let Some(&(price, side)) = self.order_index.get(order_id) else {
            trace!("cancel_order {order_id}: not resting");
            return false;
        };
        let book_side = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let Some(level) = book_side.get_mut(&price) else {
            return false;
        };
        let Some(mut order) = level.remove_order(order_id) else {
            return false;
        };
        order.set_status(OrderStatus::Cancelled);
        if level.is_empty() {
            book_side.remove(&price);
        }
        self.order_index.remove(order_id);
        trace!("cancel_order {order_id}: removed from {side} {price}");

        #[cfg(debug_assertions)]
        self.check_invariants();

        true
    }

    /// Replace the quantity of a resting order that has no fills yet.
    ///
    /// The order keeps its queue position — a quantity change never
    /// forfeits time priority. Returns `false` for unknown ids, orders
    /// with fills (status ≠ NEW), or a zero target quantity.
    pub fn modify_order(&mut self, order_id: &OrderId, new_quantity: Qty) -> bool {
        if new_quantity.is_zero() {
            return false;
        }
        let Some(&(price, side)) = self.order_index.get(order_id) else {
            return false;
        };
        let book_side = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let Some(level) = book_side.get_mut(&price) else {
            return false;
        };
        let modified = level.resize_order(order_id, new_quantity);
        if modified {
            trace!("modify_order {order_id}: quantity -> {new_quantity}");
            #[cfg(debug_assertions)]
            self.check_invariants();
        }
        modified
    }

    /// Place a residual on its side of the book, creating the level if
    /// needed, and register it in the id index.
    fn insert_resting(&mut self, order: Order) {
        let Some(price) = order.price() else {
            return; // market orders never rest
        };
        let side = order.side();
        self.order_index.insert(order.id().clone(), (price, side));
        let book_side = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        book_side
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .add_order(order);
    }
}
