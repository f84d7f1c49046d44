//! Order book semantics beyond the basic matching scenarios: FOK
//! atomicity, modify, duplicate ids, snapshot isolation, counters.

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

#[test]
fn fok_rejects_without_touching_the_book() {
    let mut book = OrderBook::new("TEST");
    book.add_order(limit("S1", 1, Side::Sell, "100", 50, TimeInForce::Gtc));
    book.add_order(limit("S2", 2, Side::Sell, "101", 30, TimeInForce::Gtc));

    // 60 units are not available at 100 or better.
    let report = book.add_order(limit("B1", 3, Side::Buy, "100", 60, TimeInForce::Fok));
    assert_eq!(report.status, OrderStatus::Rejected);
    assert!(report.trades.is_empty());
    assert_eq!(report.executed_quantity, Qty::ZERO);

    // Makers are untouched.
    assert_eq!(
        book.order(&OrderId::from("S1")).unwrap().remaining_quantity(),
        Qty::new(50)
    );
    assert_eq!(book.total_trades(), 0);
}

#[test]
fn fok_fills_completely_when_liquidity_suffices() {
    let mut book = OrderBook::new("TEST");
    book.add_order(limit("S1", 1, Side::Sell, "100", 50, TimeInForce::Gtc));
    book.add_order(limit("S2", 2, Side::Sell, "101", 30, TimeInForce::Gtc));

    let report = book.add_order(limit("B1", 3, Side::Buy, "101", 60, TimeInForce::Fok));
    assert_eq!(report.status, OrderStatus::Filled);
    assert_eq!(report.trades.len(), 2);
    assert_eq!(report.trades[0].quantity, Qty::new(50));
    assert_eq!(report.trades[1].quantity, Qty::new(10));
    assert!(!book.contains_order(&OrderId::from("B1")));
    assert_eq!(
        book.order(&OrderId::from("S2")).unwrap().remaining_quantity(),
        Qty::new(20)
    );
}

#[test]
fn market_order_on_empty_book_cancels() {
    let mut book = OrderBook::new("TEST");
    let report = book.add_order(
        Order::market(OrderId::from("M1"), 1, Side::Buy, Qty::new(10), "t", TimeInForce::Gtc)
            .unwrap(),
    );
    assert!(report.trades.is_empty());
    assert_eq!(report.status, OrderStatus::Cancelled);
    assert_eq!(report.remaining_quantity, Qty::new(10));
    assert_eq!(book.total_orders_received(), 1);
    assert_eq!(book.total_trades(), 0);
}

#[test]
fn modify_preserves_time_priority() {
    let mut book = OrderBook::new("TEST");
    book.add_order(limit("B1", 1, Side::Buy, "99", 10, TimeInForce::Gtc));
    book.add_order(limit("B2", 2, Side::Buy, "99", 10, TimeInForce::Gtc));

    // Increase B1's quantity; it must keep its place at the front.
    assert!(book.modify_order(&OrderId::from("B1"), Qty::new(40)));
    let snapshot = book.get_snapshot(5);
    assert_eq!(snapshot.bids, vec![("99".parse().unwrap(), Qty::new(50))]);

    let report = book.add_order(
        Order::market(OrderId::from("S1"), 3, Side::Sell, Qty::new(15), "t", TimeInForce::Gtc)
            .unwrap(),
    );
    assert_eq!(report.trades.len(), 1);
    assert_eq!(report.trades[0].buy_order_id, OrderId::from("B1"));
    assert_eq!(report.trades[0].quantity, Qty::new(15));
}

#[test]
fn modify_rejected_after_partial_fill_or_unknown() {
    let mut book = OrderBook::new("TEST");
    book.add_order(limit("S1", 1, Side::Sell, "100", 50, TimeInForce::Gtc));
    book.add_order(limit("B1", 2, Side::Buy, "100", 20, TimeInForce::Gtc));

    // S1 is partially filled now.
    assert!(!book.modify_order(&OrderId::from("S1"), Qty::new(100)));
    assert!(!book.modify_order(&OrderId::from("NOPE"), Qty::new(10)));
    assert!(!book.modify_order(&OrderId::from("S1"), Qty::ZERO));
    assert_eq!(
        book.order(&OrderId::from("S1")).unwrap().remaining_quantity(),
        Qty::new(30)
    );
}

#[test]
fn duplicate_live_id_is_rejected() {
    let mut book = OrderBook::new("TEST");
    book.add_order(limit("B1", 1, Side::Buy, "99", 10, TimeInForce::Gtc));
    let report = book.add_order(limit("B1", 2, Side::Buy, "98", 10, TimeInForce::Gtc));
    assert_eq!(report.status, OrderStatus::Rejected);
    assert!(report.trades.is_empty());
    assert_eq!(book.open_order_count(), 1);
    assert_eq!(
        book.order(&OrderId::from("B1")).unwrap().price(),
        Some("99".parse().unwrap())
    );
}

#[test]
fn snapshots_are_immutable_value_copies() {
    let mut book = OrderBook::new("TEST");
    book.add_order(limit("B1", 1, Side::Buy, "99", 10, TimeInForce::Gtc));
    book.add_order(limit("S1", 2, Side::Sell, "101", 20, TimeInForce::Gtc));

    let snapshot = book.get_snapshot(5);
    let frozen = snapshot.clone();

    // Mutate the book heavily.
    book.add_order(limit("B2", 3, Side::Buy, "100", 40, TimeInForce::Gtc));
    book.cancel_order(&OrderId::from("B1"));
    book.add_order(
        Order::market(OrderId::from("M1"), 4, Side::Sell, Qty::new(40), "t", TimeInForce::Gtc)
            .unwrap(),
    );

    assert_eq!(snapshot, frozen);
    assert_eq!(snapshot.bids, vec![("99".parse().unwrap(), Qty::new(10))]);
}

#[test]
fn counters_and_last_trade_price_track_activity() {
    let mut book = OrderBook::new("TEST");
    assert_eq!(book.last_trade_price(), None);

    book.add_order(limit("S1", 1, Side::Sell, "100", 50, TimeInForce::Gtc));
    book.add_order(limit("B1", 2, Side::Buy, "100", 20, TimeInForce::Gtc));
    book.add_order(limit("B2", 3, Side::Buy, "100", 10, TimeInForce::Gtc));

    assert_eq!(book.total_orders_received(), 3);
    assert_eq!(book.total_trades(), 2);
    assert_eq!(book.total_volume(), Qty::new(30));
    assert_eq!(book.last_trade_price(), Some("100".parse().unwrap()));
    assert_eq!(book.trades().len(), 2);

    // Trade ids are sequential.
    assert_eq!(book.trades()[0].trade_id, "T0");
    assert_eq!(book.trades()[1].trade_id, "T1");
}

#[test]
fn aggressive_limit_walks_levels_within_its_limit() {
    let mut book = OrderBook::new("TEST");
    book.add_order(limit("B1", 1, Side::Buy, "100", 10, TimeInForce::Gtc));
    book.add_order(limit("B2", 2, Side::Buy, "99", 10, TimeInForce::Gtc));
    book.add_order(limit("B3", 3, Side::Buy, "98", 10, TimeInForce::Gtc));

    // A sell limited at 99 may take the 100 and 99 bids but not the 98.
    let report = book.add_order(limit("S1", 4, Side::Sell, "99", 30, TimeInForce::Gtc));
    assert_eq!(report.trades.len(), 2);
    assert_eq!(report.trades[0].price, "100".parse().unwrap());
    assert_eq!(report.trades[1].price, "99".parse().unwrap());

    // The residual rests at 99; 98 bid survives. Book is not crossed.
    assert_eq!(report.status, OrderStatus::PartialFill);
    assert!(book.contains_order(&OrderId::from("S1")));
    assert_eq!(book.best_bid(), Some("98".parse().unwrap()));
    assert_eq!(book.best_ask(), Some("99".parse().unwrap()));
    book.check_invariants();
}

#[test]
fn mid_and_spread_observables() {
    let mut book = OrderBook::new("TEST");
    assert_eq!(book.mid_price(), None);
    assert_eq!(book.spread(), None);

    book.add_order(limit("B1", 1, Side::Buy, "99.5", 10, TimeInForce::Gtc));
    book.add_order(limit("S1", 2, Side::Sell, "100.5", 10, TimeInForce::Gtc));

    assert_eq!(book.mid_price(), Some("100".parse().unwrap()));
    assert_eq!(book.spread(), Some("1".parse().unwrap()));
}
