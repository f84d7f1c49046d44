//! Core price level implementation

use super::order_queue::OrderQueue;
use crate::order::{Order, OrderId, OrderStatus, Trade};
use crate::units::{Price, Qty};

/// Orders resting at a single price, matched in strict arrival order.
///
/// The level caches the sum of its orders' remaining quantities so depth
/// queries never walk the queue. The owning book destroys a level as soon
/// as its queue empties.
#[derive(Debug)]
pub struct PriceLevel {
    /// The price of this level
    price: Price,

    /// Cached sum of remaining quantities over the queue
    total_quantity: Qty,

    /// Queue of orders at this price level
    orders: OrderQueue,
}

impl PriceLevel {
    /// Create a new, empty price level
    pub fn new(price: Price) -> Self {
        Self {
            price,
            total_quantity: Qty::ZERO,
            orders: OrderQueue::new(),
        }
    }

    /// Get the price of this level
    pub fn price(&self) -> Price {
        self.price
    }

    /// Get the aggregate remaining quantity
    pub fn total_quantity(&self) -> Qty {
        self.total_quantity
    }

    /// Get the number of resting orders
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Append an order to the back of the FIFO queue
    pub fn add_order(&mut self, order: Order) {
        debug_assert_eq!(order.price(), Some(self.price), "order priced off-level");
        self.total_quantity += order.remaining_quantity();
        self.orders.push(order);
    }

    /// Remove a specific order from the level, wherever it sits in the queue
    pub fn remove_order(&mut self, order_id: &OrderId) -> Option<Order> {
        let order = self.orders.remove(order_id)?;
        self.total_quantity = self.total_quantity.saturating_sub(order.remaining_quantity());
        Some(order)
    }

    pub fn order(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.get(order_id)
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.orders.contains(order_id)
    }

    /// Replace the quantity of a resting order in place.
    ///
    /// Only orders with no fills yet (status NEW) may be resized; the order
    /// keeps its queue position either way.
    pub fn resize_order(&mut self, order_id: &OrderId, new_quantity: Qty) -> bool {
        let Some(order) = self.orders.get_mut(order_id) else {
            return false;
        };
        if order.status() != OrderStatus::New {
            return false;
        }
        self.total_quantity = self.total_quantity.saturating_sub(order.remaining_quantity());
        order.resize(new_quantity);
        self.total_quantity += new_quantity;
        true
    }

    /// Match an incoming order against this level in FIFO order.
    ///
    /// Fills execute at this level's price (the passive price). Trades are
    /// appended to `trades` in execution order; `trade_seq` feeds sequential
    /// trade ids. Returns the ids of makers that filled completely and left
    /// the queue, so the book can drop them from its id index.
    pub fn match_incoming(
        &mut self,
        taker: &mut Order,
        trade_seq: &mut u64,
        trades: &mut Vec<Trade>,
    ) -> Vec<OrderId> {
        let mut filled_order_ids = Vec::new();
        let price = self.price;

        while !taker.remaining_quantity().is_zero() {
            let Some(maker) = self.orders.front_mut() else {
                break;
            };
            let fill_qty = taker.remaining_quantity().min(maker.remaining_quantity());
            let trade = Trade::new(
                format!("T{trade_seq}"),
                taker.timestamp(),
                taker.id(),
                maker.id(),
                taker.side(),
                price,
                fill_qty,
            );
            *trade_seq += 1;

            maker.fill(fill_qty);
            let maker_done = maker.is_filled();
            let maker_id = if maker_done { Some(maker.id().clone()) } else { None };

            taker.fill(fill_qty);
            self.total_quantity = self.total_quantity.saturating_sub(fill_qty);
            trades.push(trade);

            if let Some(id) = maker_id {
                self.orders.pop_front();
                filled_order_ids.push(id);
            }
        }

        filled_order_ids
    }

    /// Live orders in time priority
    pub fn iter_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter_fifo()
    }
}
