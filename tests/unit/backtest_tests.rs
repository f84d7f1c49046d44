//! End-to-end strategy backtests against synthetic replay.

use lobsim::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

fn dense_config(seed: u64) -> BacktestConfig {
    BacktestConfig {
        duration_secs: 30.0,
        snapshot_interval_secs: 1.0,
        snapshot_depth: 10,
        generator: GeneratorConfig {
            seed,
            arrival_rate: 100.0,
            market_order_prob: 0.1,
            cancel_prob: 0.1,
            ..GeneratorConfig::default()
        },
    }
}

#[test]
fn aggressive_twap_executes_against_synthetic_flow() {
    let book = Rc::new(RefCell::new(OrderBook::new("SYNTH")));
    let mut backtester = Backtester::new(Rc::clone(&book));

    // Aggression 1.0: every slice is a market order into a dense book.
    let twap = TwapStrategy::new("SYNTH", Side::Buy, Qty::new(500), 30.0, 10, 1.0);
    let (twap, results) = backtester
        .backtest_strategy(twap, &dense_config(42))
        .unwrap();

    assert!(results.num_child_orders >= 1);
    assert!(results.num_child_orders <= 10);
    assert!(!results.executed_quantity.is_zero(), "no fills at all");
    assert!(results.executed_quantity <= results.target_quantity);
    assert!(results.fill_rate > 0.0 && results.fill_rate <= 1.0);
    assert!(results.strategy_vwap.is_some());
    assert_eq!(results.target_quantity, Qty::new(500));
    assert_eq!(twap.executed_quantity(), results.executed_quantity);
    assert!(results.num_fills > 0);

    book.borrow().check_invariants();
}

#[test]
fn strategy_fills_reconcile_with_book_trades() {
    let book = Rc::new(RefCell::new(OrderBook::new("SYNTH")));
    let mut backtester = Backtester::new(Rc::clone(&book));

    let twap = TwapStrategy::new("SYNTH", Side::Sell, Qty::new(300), 30.0, 10, 1.0);
    let (twap, results) = backtester
        .backtest_strategy(twap, &dense_config(7))
        .unwrap();

    // Every fill credited to the strategy appears in the book's history
    // against one of its child ids.
    let book = book.borrow();
    let child_volume: Qty = book
        .trades()
        .iter()
        .filter(|t| {
            twap.state()
                .child_orders()
                .iter()
                .any(|child| t.involves(child))
        })
        .map(|t| t.quantity)
        .sum();
    assert_eq!(child_volume, results.executed_quantity);
    assert_eq!(twap.is_complete(), results.fill_rate >= 1.0);
}

#[test]
fn vwap_and_pov_run_to_completion_without_violating_invariants() {
    let book = Rc::new(RefCell::new(OrderBook::new("SYNTH")));
    let mut backtester = Backtester::new(Rc::clone(&book));
    let vwap = VwapStrategy::new("SYNTH", Side::Buy, Qty::new(400), 30.0, 0.9)
        .with_slice_interval(2.0);
    let (_, results) = backtester
        .backtest_strategy(vwap, &dense_config(11))
        .unwrap();
    assert!(results.executed_quantity <= results.target_quantity);
    book.borrow().check_invariants();

    let book = Rc::new(RefCell::new(OrderBook::new("SYNTH")));
    let mut backtester = Backtester::new(Rc::clone(&book));
    let pov = PovStrategy::new("SYNTH", Side::Sell, Qty::new(400), 0.2, 30.0, 0.9)
        .with_check_interval(2.0);
    let (pov, results) = backtester
        .backtest_strategy(pov, &dense_config(13))
        .unwrap();
    assert!(results.executed_quantity <= results.target_quantity);
    assert_eq!(results.num_child_orders, pov.state().child_orders().len());
    book.borrow().check_invariants();
}

#[test]
fn posting_strategy_reprices_without_duplicate_quantity() {
    let book = Rc::new(RefCell::new(OrderBook::new("SYNTH")));
    let mut backtester = Backtester::new(Rc::clone(&book));

    let posting = PostingStrategy::new("SYNTH", Side::Buy, Qty::new(200), 0.3, 0.0001)
        .with_max_order_size(Qty::new(50));
    let (posting, results) = backtester
        .backtest_strategy(posting, &dense_config(17))
        .unwrap();

    // At most one posted child may still be resting: every reprice must
    // have cancelled its predecessor.
    let book = book.borrow();
    let resting_children = posting
        .state()
        .child_orders()
        .iter()
        .filter(|child| book.contains_order(child))
        .count();
    assert!(resting_children <= 1, "{resting_children} children resting");
    assert!(results.executed_quantity <= results.target_quantity);
    book.check_invariants();
}

#[test]
fn slippage_is_signed_against_arrival() {
    let book = Rc::new(RefCell::new(OrderBook::new("SYNTH")));
    let mut backtester = Backtester::new(book);

    let twap = TwapStrategy::new("SYNTH", Side::Buy, Qty::new(200), 30.0, 10, 1.0);
    let (_, results) = backtester
        .backtest_strategy(twap, &dense_config(23))
        .unwrap();

    match (results.strategy_vwap, results.arrival_price) {
        (Some(vwap), Some(arrival)) => {
            let expected = vwap - arrival;
            assert!((results.slippage - expected).abs() < 1e-9);
            assert!(
                (results.slippage_bps - expected / arrival * 10_000.0).abs() < 1e-6
            );
        }
        _ => {
            assert_eq!(results.slippage, 0.0);
            assert_eq!(results.slippage_bps, 0.0);
        }
    }
}
