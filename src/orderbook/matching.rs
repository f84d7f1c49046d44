//! Contains the core matching engine logic for the order book.

use super::book::OrderBook;
use crate::order::{Order, Side, Trade};
use crate::units::{Price, Qty};

impl OrderBook {
    /// Match `order` against the opposite side until its quantity is
    /// exhausted, the opposite side empties, or the limit price blocks
    /// further fills. `limit_price = None` matches at any price (market
    /// orders).
    ///
    /// The ordered price index makes each step O(log P): the best opposite
    /// level is the first (asks) or last (bids) key, and within a level
    /// orders fill strictly FIFO. Filled makers are dropped from the id
    /// index and emptied levels from the side index before returning.
    pub(super) fn match_against(
        &mut self,
        order: &mut Order,
        limit_price: Option<Price>,
    ) -> Vec<Trade> {
        let mut trades = Vec::new();

        loop {
            if order.remaining_quantity().is_zero() {
                break;
            }

            let best = match order.side() {
                Side::Buy => self.asks.first_key_value().map(|(price, _)| *price),
                Side::Sell => self.bids.last_key_value().map(|(price, _)| *price),
            };
            let Some(best_price) = best else {
                break;
            };

            if let Some(limit) = limit_price {
                let blocked = match order.side() {
                    Side::Buy => best_price > limit,
                    Side::Sell => best_price < limit,
                };
                if blocked {
                    break;
                }
            }

            let book_side = match order.side() {
                Side::Buy => &mut self.asks,
                Side::Sell => &mut self.bids,
            };
            let Some(level) = book_side.get_mut(&best_price) else {
                break;
            };

            let filled_makers = level.match_incoming(order, &mut self.trade_seq, &mut trades);
            let level_empty = level.is_empty();

            for maker_id in &filled_makers {
                self.order_index.remove(maker_id);
            }
            if level_empty {
                book_side.remove(&best_price);
            }
        }

        trades
    }

    /// Read-only walk of the opposite side proving whether `quantity` can
    /// fill completely within `limit_price`.
    ///
    /// Fill-or-kill orders are decided by this check before any state is
    /// touched, so a rejected FOK leaves no partially executed makers
    /// behind.
    pub(super) fn is_fully_fillable(
        &self,
        side: Side,
        quantity: Qty,
        limit_price: Option<Price>,
    ) -> bool {
        let mut available = Qty::ZERO;
        match side {
            Side::Buy => {
                for (price, level) in self.asks.iter() {
                    if let Some(limit) = limit_price {
                        if *price > limit {
                            break;
                        }
                    }
                    available += level.total_quantity();
                    if available >= quantity {
                        return true;
                    }
                }
            }
            Side::Sell => {
                for (price, level) in self.bids.iter().rev() {
                    if let Some(limit) = limit_price {
                        if *price < limit {
                            break;
                        }
                    }
                    available += level.total_quantity();
                    if available >= quantity {
                        return true;
                    }
                }
            }
        }
        available >= quantity
    }
}
