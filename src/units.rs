//! Exact fixed-point price and quantity types.
//!
//! Binary floating point never enters the matching path: a [`Price`] is a
//! `u64` count of 10⁻⁴ ticks and a [`Qty`] is a whole `u64` unit count.
//! Both round-trip exactly through their decimal string form, which is also
//! how they appear in CSV output.

use crate::errors::OrderError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// A price expressed as an exact count of 10⁻⁴ ticks.
///
/// `Price::from_str("100.25")` and `Price::from_ticks(1_002_500)` denote the
/// same price; `Display` emits the shortest exact decimal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(u64);

impl Price {
    /// Decimal places carried by every price.
    pub const DECIMALS: u32 = 4;
    /// Ticks per whole price unit.
    pub const SCALE: u64 = 10_u64.pow(Self::DECIMALS);

    /// The zero price. Never valid as a limit price.
    pub const ZERO: Price = Price(0);

    /// Builds a price from a raw tick count.
    pub const fn from_ticks(ticks: u64) -> Self {
        Price(ticks)
    }

    /// The raw tick count.
    pub const fn ticks(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Rounds a float (in whole price units) to the nearest tick.
    ///
    /// Returns `None` for non-finite, negative, or out-of-range inputs.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let ticks = (value * Self::SCALE as f64).round();
        if ticks > u64::MAX as f64 {
            return None;
        }
        Some(Price(ticks as u64))
    }

    /// Lossy float view, for metrics and display only.
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    pub fn checked_add(self, rhs: Price) -> Option<Price> {
        self.0.checked_add(rhs.0).map(Price)
    }

    pub fn checked_sub(self, rhs: Price) -> Option<Price> {
        self.0.checked_sub(rhs.0).map(Price)
    }

    pub fn saturating_sub(self, rhs: Price) -> Price {
        Price(self.0.saturating_sub(rhs.0))
    }

    /// Midpoint of two prices, truncated to the tick grid.
    pub fn midpoint(a: Price, b: Price) -> Price {
        Price(((a.0 as u128 + b.0 as u128) / 2) as u64)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::SCALE;
        let frac = self.0 % Self::SCALE;
        if frac == 0 {
            write!(f, "{whole}")
        } else {
            let digits = format!("{frac:04}");
            write!(f, "{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}

impl FromStr for Price {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_error = || OrderError::ParseError {
            message: format!("invalid price: {s}"),
        };
        let (whole_str, frac_str) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole_str.is_empty() || frac_str.len() > Self::DECIMALS as usize {
            return Err(parse_error());
        }
        let whole: u64 = whole_str.parse().map_err(|_| parse_error())?;
        let frac: u64 = if frac_str.is_empty() {
            0
        } else {
            let padded: u64 = frac_str.parse().map_err(|_| parse_error())?;
            padded * 10_u64.pow(Self::DECIMALS - frac_str.len() as u32)
        };
        whole
            .checked_mul(Self::SCALE)
            .and_then(|t| t.checked_add(frac))
            .map(Price)
            .ok_or_else(parse_error)
    }
}

// Prices travel as decimal strings so serialized forms carry no binary
// float representation.
impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Price::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// A whole-unit order quantity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Qty(u64);

impl Qty {
    pub const ZERO: Qty = Qty(0);

    pub const fn new(units: u64) -> Self {
        Qty(units)
    }

    pub const fn units(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn min(self, other: Qty) -> Qty {
        Qty(self.0.min(other.0))
    }

    pub fn saturating_sub(self, rhs: Qty) -> Qty {
        Qty(self.0.saturating_sub(rhs.0))
    }

    /// Rounds a float to the nearest whole quantity, clamping below at zero.
    pub fn from_f64(value: f64) -> Qty {
        if !value.is_finite() || value <= 0.0 {
            return Qty::ZERO;
        }
        Qty(value.round() as u64)
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

impl Add for Qty {
    type Output = Qty;

    fn add(self, rhs: Qty) -> Qty {
        Qty(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Qty {
    fn add_assign(&mut self, rhs: Qty) {
        *self = *self + rhs;
    }
}

impl Sum for Qty {
    fn sum<I: Iterator<Item = Qty>>(iter: I) -> Qty {
        iter.fold(Qty::ZERO, |acc, q| acc + q)
    }
}

impl fmt::Display for Qty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Qty {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Qty).map_err(|_| OrderError::ParseError {
            message: format!("invalid quantity: {s}"),
        })
    }
}

/// Price × quantity in raw tick-units. Exact, for cost accumulation.
pub fn notional_ticks(price: Price, quantity: Qty) -> u128 {
    price.ticks() as u128 * quantity.units() as u128
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display_trims_trailing_zeros() {
        assert_eq!(Price::from_ticks(1_000_000).to_string(), "100");
        assert_eq!(Price::from_ticks(1_002_500).to_string(), "100.25");
        assert_eq!(Price::from_ticks(1_000_001).to_string(), "100.0001");
        assert_eq!(Price::from_ticks(5_000).to_string(), "0.5");
    }

    #[test]
    fn test_price_parse_exact() {
        assert_eq!("100".parse::<Price>().unwrap(), Price::from_ticks(1_000_000));
        assert_eq!("100.25".parse::<Price>().unwrap(), Price::from_ticks(1_002_500));
        assert_eq!("0.0001".parse::<Price>().unwrap(), Price::from_ticks(1));
        assert!("100.00001".parse::<Price>().is_err());
        assert!("-1".parse::<Price>().is_err());
        assert!("".parse::<Price>().is_err());
        assert!(".5".parse::<Price>().is_err());
    }

    #[test]
    fn test_price_string_round_trip() {
        for ticks in [0, 1, 9_999, 10_000, 1_002_500, 123_456_789] {
            let price = Price::from_ticks(ticks);
            let parsed: Price = price.to_string().parse().unwrap();
            assert_eq!(parsed, price);
        }
    }

    #[test]
    fn test_price_from_f64_rounds_to_tick() {
        assert_eq!(Price::from_f64(100.25), Some(Price::from_ticks(1_002_500)));
        assert_eq!(Price::from_f64(-1.0), None);
        assert_eq!(Price::from_f64(f64::NAN), None);
    }

    #[test]
    fn test_price_midpoint() {
        let bid = "99.5".parse::<Price>().unwrap();
        let ask = "100.5".parse::<Price>().unwrap();
        assert_eq!(Price::midpoint(bid, ask).to_string(), "100");
    }

    #[test]
    fn test_price_serde_as_string() {
        let price = Price::from_ticks(1_002_500);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"100.25\"");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }

    #[test]
    fn test_qty_arithmetic() {
        let a = Qty::new(30);
        let b = Qty::new(12);
        assert_eq!(a + b, Qty::new(42));
        assert_eq!(b.saturating_sub(a), Qty::ZERO);
        assert_eq!(a.min(b), b);
        assert_eq!(Qty::from_f64(10.4), Qty::new(10));
        assert_eq!(Qty::from_f64(-3.0), Qty::ZERO);
    }

    #[test]
    fn test_notional_is_exact() {
        let price = "100.25".parse::<Price>().unwrap();
        assert_eq!(notional_ticks(price, Qty::new(3)), 3_007_500);
    }
}
