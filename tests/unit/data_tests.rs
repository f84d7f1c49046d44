//! CSV persistence round trips.

use lobsim::prelude::*;
use tempfile::tempdir;

fn limit(id: &str, ts: u64, side: Side, price: &str, qty: u64) -> Order {
    Order::limit(
        OrderId::from(id),
        ts,
        side,
        price.parse().unwrap(),
        Qty::new(qty),
        "tester",
        TimeInForce::Gtc,
    )
    .unwrap()
}

fn populated_book() -> OrderBook {
    let mut book = OrderBook::new("CSV");
    book.add_order(limit("B1", 1, Side::Buy, "99.5", 10));
    book.add_order(limit("B2", 2, Side::Buy, "99.25", 25));
    book.add_order(limit("S1", 3, Side::Sell, "100.5", 5));
    book.add_order(limit("S2", 4, Side::Sell, "101", 40));
    // One trade so last_trade_price is set.
    book.add_order(limit("B3", 5, Side::Buy, "100.5", 5));
    book
}

#[test]
fn snapshot_csv_round_trip_is_exact() {
    let book = populated_book();
    let snapshots = vec![book.get_snapshot(10), book.get_snapshot(1)];

    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshots.csv");
    save_snapshots_csv(&snapshots, &path, 10).unwrap();
    let loaded = load_snapshots_csv(&path).unwrap();

    assert_eq!(loaded.len(), snapshots.len());
    for (loaded, original) in loaded.iter().zip(&snapshots) {
        assert_eq!(loaded.bids, original.bids);
        assert_eq!(loaded.asks, original.asks);
        assert_eq!(loaded.last_trade_price, original.last_trade_price);
        assert_eq!(loaded.timestamp, original.timestamp);
    }
}

#[test]
fn snapshot_csv_preserves_fractional_prices_as_decimal_strings() {
    let snapshots = vec![BookSnapshot {
        timestamp: 7,
        bids: vec![(Price::from_ticks(999_999), Qty::new(3))],
        asks: vec![],
        last_trade_price: None,
    }];

    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshots.csv");
    save_snapshots_csv(&snapshots, &path, 2).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    // 999_999 ticks = 99.9999: no binary-float representation sneaks in.
    assert!(raw.contains("99.9999"), "raw csv: {raw}");

    let loaded = load_snapshots_csv(&path).unwrap();
    assert_eq!(loaded[0].bids, snapshots[0].bids);
}

#[test]
fn trade_csv_round_trip_is_exact() {
    let book = populated_book();
    assert!(!book.trades().is_empty());

    let dir = tempdir().unwrap();
    let path = dir.path().join("trades.csv");
    save_trades_csv(book.trades(), &path).unwrap();
    let loaded = load_trades_csv(&path).unwrap();

    assert_eq!(loaded, book.trades());
}

#[test]
fn empty_snapshot_file_loads_as_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshots.csv");
    save_snapshots_csv(&[], &path, 10).unwrap();
    assert!(load_snapshots_csv(&path).unwrap().is_empty());
}

#[test]
fn malformed_snapshot_row_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshots.csv");
    std::fs::write(
        &path,
        "timestamp,bid_price_1,bid_size_1,ask_price_1,ask_size_1,last_trade_price\n\
         not_a_number,99.5,10,100.5,5,\n",
    )
    .unwrap();
    match load_snapshots_csv(&path) {
        Err(DataError::Parse { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected a parse error, got {other:?}"),
    }
}
