//! Walkthrough of the matching engine basics:
//! 1. Seed the book with resting bids and asks
//! 2. Cross it with limit and market orders
//! 3. Cancel and modify resting orders
//! 4. Inspect the resulting trades and book state

use lobsim::prelude::*;
use tracing::info;

fn main() {
    tracing_subscriber::fmt::init();
    info!("=== Basic Matching Demo ===");

    let mut book = OrderBook::new("DEMO/USD");

    info!("Step 1: seeding resting liquidity");
    let resting = [
        (Side::Buy, "99.50", 100),
        (Side::Buy, "99.40", 150),
        (Side::Buy, "99.30", 200),
        (Side::Sell, "100.50", 100),
        (Side::Sell, "100.60", 150),
        (Side::Sell, "100.70", 200),
    ];
    for (i, (side, price, qty)) in resting.iter().enumerate() {
        let order = Order::limit(
            OrderId::from(format!("SEED{i}")),
            current_time_nanos(),
            *side,
            price.parse().unwrap(),
            Qty::new(*qty),
            "maker",
            TimeInForce::Gtc,
        )
        .unwrap();
        book.add_order(order);
    }
    print_top(&book);

    info!("Step 2: crossing limit buy of 120 @ 100.60");
    let report = book.add_order(
        Order::limit(
            OrderId::from("CROSS1"),
            current_time_nanos(),
            Side::Buy,
            "100.60".parse().unwrap(),
            Qty::new(120),
            "taker",
            TimeInForce::Gtc,
        )
        .unwrap(),
    );
    print_trades(&report);
    print_top(&book);

    info!("Step 3: market sell sweeping the bid side");
    let report = book.add_order(
        Order::market(
            OrderId::from("SWEEP1"),
            current_time_nanos(),
            Side::Sell,
            Qty::new(300),
            "taker",
            TimeInForce::Gtc,
        )
        .unwrap(),
    );
    print_trades(&report);
    print_top(&book);

    info!("Step 4: cancel and modify");
    let cancelled = book.cancel_order(&OrderId::from("SEED5"));
    info!("cancel SEED5 -> {cancelled}");
    let modified = book.modify_order(&OrderId::from("SEED4"), Qty::new(75));
    info!("modify SEED4 to 75 -> {modified}");
    print_top(&book);

    info!(
        "Done: {} orders received, {} trades, volume {}",
        book.total_orders_received(),
        book.total_trades(),
        book.total_volume()
    );
}

fn print_top(book: &OrderBook) {
    let snapshot = book.get_snapshot(5);
    info!(
        "book: bid {:?} / ask {:?} (spread {:?})",
        snapshot.best_bid().map(|p| p.to_string()),
        snapshot.best_ask().map(|p| p.to_string()),
        snapshot.spread().map(|p| p.to_string()),
    );
    for (price, qty) in &snapshot.asks {
        info!("  ask {price} x {qty}");
    }
    for (price, qty) in &snapshot.bids {
        info!("  bid {price} x {qty}");
    }
}

fn print_trades(report: &ExecutionReport) {
    info!(
        "order {}: status {}, executed {}",
        report.order_id, report.status, report.executed_quantity
    );
    for trade in &report.trades {
        info!(
            "  trade {}: {} {} @ {} (aggressor {})",
            trade.trade_id, trade.quantity, trade.buy_order_id, trade.price, trade.aggressor_side
        );
    }
}
