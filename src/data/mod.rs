//! Persisted market-data formats: CSV snapshots and trades, plus LOBSTER
//! message-file ingest.
//!
//! Prices and quantities are written as their exact decimal strings, so a
//! snapshot survives a save/load round trip bit-for-bit.

use crate::order::{Order, OrderId, Side, TimeInForce, Trade};
use crate::orderbook::BookSnapshot;
use crate::replay::MarketEvent;
use crate::units::{Price, Qty};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading or writing market-data files.
#[derive(Debug, Error)]
pub enum DataError {
    /// Underlying file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A malformed line or field.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number within the file.
        line: usize,
        /// Description of the malformed content.
        message: String,
    },
}

fn parse_field<T>(raw: &str, line: usize, what: &str) -> Result<T, DataError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse::<T>().map_err(|e| DataError::Parse {
        line,
        message: format!("{what} `{raw}`: {e}"),
    })
}

/// Save snapshots to CSV with `depth` levels per side.
///
/// Schema: `timestamp, bid_price_1, bid_size_1, …, bid_price_N,
/// bid_size_N, ask_price_1, …, ask_size_N, last_trade_price`. Cells past
/// a side's available depth are left empty.
pub fn save_snapshots_csv(
    snapshots: &[BookSnapshot],
    path: impl AsRef<Path>,
    depth: usize,
) -> Result<(), DataError> {
    let mut writer = BufWriter::new(File::create(path)?);

    let mut header = vec!["timestamp".to_string()];
    for i in 1..=depth {
        header.push(format!("bid_price_{i}"));
        header.push(format!("bid_size_{i}"));
    }
    for i in 1..=depth {
        header.push(format!("ask_price_{i}"));
        header.push(format!("ask_size_{i}"));
    }
    header.push("last_trade_price".to_string());
    writeln!(writer, "{}", header.join(","))?;

    for snapshot in snapshots {
        let mut row = vec![snapshot.timestamp.to_string()];
        for i in 0..depth {
            match snapshot.bids.get(i) {
                Some(&(price, qty)) => {
                    row.push(price.to_string());
                    row.push(qty.to_string());
                }
                None => {
                    row.push(String::new());
                    row.push(String::new());
                }
            }
        }
        for i in 0..depth {
            match snapshot.asks.get(i) {
                Some(&(price, qty)) => {
                    row.push(price.to_string());
                    row.push(qty.to_string());
                }
                None => {
                    row.push(String::new());
                    row.push(String::new());
                }
            }
        }
        row.push(
            snapshot
                .last_trade_price
                .map(|p| p.to_string())
                .unwrap_or_default(),
        );
        writeln!(writer, "{}", row.join(","))?;
    }

    writer.flush()?;
    Ok(())
}

/// Load snapshots from a CSV file written by [`save_snapshots_csv`].
pub fn load_snapshots_csv(path: impl AsRef<Path>) -> Result<Vec<BookSnapshot>, DataError> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => return Ok(Vec::new()),
    };
    let columns = header.split(',').count();
    if columns < 2 || (columns - 2) % 4 != 0 {
        return Err(DataError::Parse {
            line: 1,
            message: format!("unexpected snapshot column count {columns}"),
        });
    }
    let depth = (columns - 2) / 4;

    let mut snapshots = Vec::new();
    for (index, line) in lines.enumerate() {
        let line_no = index + 2;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != columns {
            return Err(DataError::Parse {
                line: line_no,
                message: format!("expected {columns} fields, found {}", fields.len()),
            });
        }

        let timestamp: u64 = parse_field(fields[0], line_no, "timestamp")?;

        let mut bids = Vec::new();
        for i in 0..depth {
            let price_raw = fields[1 + 2 * i];
            if price_raw.is_empty() {
                break;
            }
            let price: Price = parse_field(price_raw, line_no, "bid price")?;
            let qty: Qty = parse_field(fields[2 + 2 * i], line_no, "bid size")?;
            bids.push((price, qty));
        }

        let ask_base = 1 + 2 * depth;
        let mut asks = Vec::new();
        for i in 0..depth {
            let price_raw = fields[ask_base + 2 * i];
            if price_raw.is_empty() {
                break;
            }
            let price: Price = parse_field(price_raw, line_no, "ask price")?;
            let qty: Qty = parse_field(fields[ask_base + 1 + 2 * i], line_no, "ask size")?;
            asks.push((price, qty));
        }

        let last_raw = fields[columns - 1];
        let last_trade_price = if last_raw.is_empty() {
            None
        } else {
            Some(parse_field(last_raw, line_no, "last trade price")?)
        };

        snapshots.push(BookSnapshot {
            timestamp,
            bids,
            asks,
            last_trade_price,
        });
    }

    Ok(snapshots)
}

/// Save trades to CSV.
///
/// Schema: `trade_id, timestamp, buy_order_id, sell_order_id, price,
/// quantity, aggressor_side`.
pub fn save_trades_csv(trades: &[Trade], path: impl AsRef<Path>) -> Result<(), DataError> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(
        writer,
        "trade_id,timestamp,buy_order_id,sell_order_id,price,quantity,aggressor_side"
    )?;
    for trade in trades {
        writeln!(
            writer,
            "{},{},{},{},{},{},{}",
            trade.trade_id,
            trade.timestamp,
            trade.buy_order_id,
            trade.sell_order_id,
            trade.price,
            trade.quantity,
            trade.aggressor_side
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Load trades from a CSV file written by [`save_trades_csv`].
pub fn load_trades_csv(path: impl AsRef<Path>) -> Result<Vec<Trade>, DataError> {
    let reader = BufReader::new(File::open(path)?);
    let mut trades = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        if index == 0 || line.trim().is_empty() {
            continue; // header
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 7 {
            return Err(DataError::Parse {
                line: line_no,
                message: format!("expected 7 fields, found {}", fields.len()),
            });
        }
        trades.push(Trade {
            trade_id: fields[0].trim().to_string(),
            timestamp: parse_field(fields[1], line_no, "timestamp")?,
            buy_order_id: OrderId::from(fields[2].trim()),
            sell_order_id: OrderId::from(fields[3].trim()),
            price: parse_field(fields[4], line_no, "price")?,
            quantity: parse_field(fields[5], line_no, "quantity")?,
            aggressor_side: parse_field(fields[6], line_no, "aggressor side")?,
        });
    }

    Ok(trades)
}

/// Load a LOBSTER message file into replayable events.
///
/// Each row is `timestamp_seconds, event_type, order_id, size, price,
/// direction`. Timestamps are seconds and become nanoseconds; LOBSTER
/// prices are integers in 10⁻⁴ currency units, which is exactly the
/// [`Price`] tick grid. Event type 1 (new limit order) becomes a GTC
/// submission and type 3 (delete) a cancellation; other event types are
/// skipped, as their interpretation depends on the venue reconstruction.
pub fn load_lobster_messages(path: impl AsRef<Path>) -> Result<Vec<MarketEvent>, DataError> {
    let reader = BufReader::new(File::open(path)?);
    let mut events = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 6 {
            return Err(DataError::Parse {
                line: line_no,
                message: format!("expected 6 fields, found {}", fields.len()),
            });
        }

        let seconds: f64 = parse_field(fields[0], line_no, "timestamp")?;
        let timestamp = (seconds * 1e9) as u64;
        let event_type: u32 = parse_field(fields[1], line_no, "event type")?;
        let raw_order_id: u64 = parse_field(fields[2], line_no, "order id")?;
        let order_id = OrderId::from(format!("L{raw_order_id}"));

        match event_type {
            1 => {
                let size: Qty = parse_field(fields[3], line_no, "size")?;
                let price_ticks: u64 = parse_field(fields[4], line_no, "price")?;
                let direction: i64 = parse_field(fields[5], line_no, "direction")?;
                let side = if direction > 0 { Side::Buy } else { Side::Sell };
                let order = Order::limit(
                    order_id,
                    timestamp,
                    side,
                    Price::from_ticks(price_ticks),
                    size,
                    "lobster",
                    TimeInForce::Gtc,
                )
                .map_err(|e| DataError::Parse {
                    line: line_no,
                    message: format!("invalid order: {e}"),
                })?;
                events.push(MarketEvent::New { order });
            }
            3 => {
                events.push(MarketEvent::Cancel {
                    order_id,
                    timestamp,
                });
            }
            _ => {}
        }
    }

    Ok(events)
}
