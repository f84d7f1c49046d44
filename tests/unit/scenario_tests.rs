//! End-to-end matching scenarios with literal inputs and expected outputs.

use lobsim::prelude::*;

fn limit(id: &str, ts: u64, side: Side, price: &str, qty: u64, tif: TimeInForce) -> Order {
    Order::limit(
        OrderId::from(id),
        ts,
        side,
        price.parse().unwrap(),
        Qty::new(qty),
        "tester",
        tif,
    )
    .unwrap()
}

fn market(id: &str, ts: u64, side: Side, qty: u64) -> Order {
    Order::market(OrderId::from(id), ts, side, Qty::new(qty), "tester", TimeInForce::Gtc).unwrap()
}

#[test]
fn limit_match_executes_at_passive_price() {
    let mut book = OrderBook::new("TEST");
    book.add_order(limit("S1", 1, Side::Sell, "100", 100, TimeInForce::Gtc));

    let report = book.add_order(limit("B1", 2, Side::Buy, "100", 50, TimeInForce::Gtc));

    assert_eq!(report.trades.len(), 1);
    let trade = &report.trades[0];
    assert_eq!(trade.price, "100".parse().unwrap());
    assert_eq!(trade.quantity, Qty::new(50));
    assert_eq!(trade.buy_order_id, OrderId::from("B1"));
    assert_eq!(trade.sell_order_id, OrderId::from("S1"));
    assert_eq!(trade.aggressor_side, Side::Buy);

    assert_eq!(book.best_ask(), Some("100".parse().unwrap()));
    let snapshot = book.get_snapshot(5);
    assert_eq!(snapshot.asks, vec![("100".parse().unwrap(), Qty::new(50))]);
    assert!(snapshot.bids.is_empty());
}

#[test]
fn market_order_sweeps_three_levels() {
    let mut book = OrderBook::new("TEST");
    book.add_order(limit("S1", 1, Side::Sell, "100", 50, TimeInForce::Gtc));
    book.add_order(limit("S2", 2, Side::Sell, "101", 50, TimeInForce::Gtc));
    book.add_order(limit("S3", 3, Side::Sell, "102", 50, TimeInForce::Gtc));

    let report = book.add_order(market("B1", 4, Side::Buy, 120));

    assert_eq!(report.trades.len(), 3);
    let fills: Vec<(String, u64)> = report
        .trades
        .iter()
        .map(|t| (t.price.to_string(), t.quantity.units()))
        .collect();
    assert_eq!(
        fills,
        vec![
            ("100".to_string(), 50),
            ("101".to_string(), 50),
            ("102".to_string(), 20)
        ]
    );
    assert_eq!(report.executed_quantity, Qty::new(120));
    assert!(report.is_complete());

    assert_eq!(book.best_ask(), Some("102".parse().unwrap()));
    let snapshot = book.get_snapshot(5);
    assert_eq!(snapshot.asks, vec![("102".parse().unwrap(), Qty::new(30))]);
}

#[test]
fn fifo_priority_within_a_price_level() {
    let mut book = OrderBook::new("TEST");
    book.add_order(limit("S0", 1, Side::Sell, "100", 10, TimeInForce::Gtc));
    book.add_order(limit("S1", 2, Side::Sell, "100", 10, TimeInForce::Gtc));
    book.add_order(limit("S2", 3, Side::Sell, "100", 10, TimeInForce::Gtc));

    let report = book.add_order(market("B1", 4, Side::Buy, 25));

    assert_eq!(report.trades.len(), 3);
    assert_eq!(report.trades[0].sell_order_id, OrderId::from("S0"));
    assert_eq!(report.trades[1].sell_order_id, OrderId::from("S1"));
    assert_eq!(report.trades[2].sell_order_id, OrderId::from("S2"));
    assert_eq!(report.trades[2].quantity, Qty::new(5));

    let resting = book.order(&OrderId::from("S2")).unwrap();
    assert_eq!(resting.remaining_quantity(), Qty::new(5));
    assert_eq!(resting.status(), OrderStatus::PartialFill);
    assert!(!book.contains_order(&OrderId::from("S0")));
}

#[test]
fn ioc_residual_is_cancelled_and_never_rests() {
    let mut book = OrderBook::new("TEST");
    book.add_order(limit("S1", 1, Side::Sell, "100", 50, TimeInForce::Gtc));

    let report = book.add_order(limit("B1", 2, Side::Buy, "100", 100, TimeInForce::Ioc));

    assert_eq!(report.trades.len(), 1);
    assert_eq!(report.trades[0].quantity, Qty::new(50));
    assert_eq!(report.status, OrderStatus::Cancelled);
    assert_eq!(report.remaining_quantity, Qty::new(50));
    assert!(!book.contains_order(&OrderId::from("B1")));
    assert_eq!(book.best_bid(), None);
    assert_eq!(book.best_ask(), None);
}

#[test]
fn cancel_is_constant_time_and_idempotent() {
    let mut book = OrderBook::new("TEST");
    book.add_order(limit("B1", 1, Side::Buy, "99", 100, TimeInForce::Gtc));
    assert_eq!(book.best_bid(), Some("99".parse().unwrap()));

    assert!(book.cancel_order(&OrderId::from("B1")));
    assert_eq!(book.best_bid(), None);

    // Second cancel of the same id: false, state unchanged.
    assert!(!book.cancel_order(&OrderId::from("B1")));
    assert_eq!(book.best_bid(), None);
    assert_eq!(book.open_order_count(), 0);
}

#[test]
fn twap_slices_price_at_the_mid() {
    // Target 1000 over 60s in 10 slices at aggression 0.5, with a
    // 99.5/100.5 book visible at t = 0, 6, 12, …, 54.
    let snapshot = BookSnapshot {
        timestamp: 0,
        bids: vec![("99.5".parse().unwrap(), Qty::new(1000))],
        asks: vec![("100.5".parse().unwrap(), Qty::new(1000))],
        last_trade_price: None,
    };
    let mut twap = TwapStrategy::new("TEST", Side::Buy, Qty::new(1000), 60.0, 10, 0.5);

    let mut children = Vec::new();
    for step in 0..10 {
        children.extend(twap.generate_orders(&snapshot, step as f64 * 6.0));
    }

    assert_eq!(children.len(), 10);
    for child in &children {
        assert_eq!(child.quantity(), Qty::new(100));
        assert_eq!(child.price(), Some("100".parse().unwrap()));
    }
}
