use crate::errors::OrderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents the current status of an order in the system.
///
/// Status only moves forward: NEW → PARTIAL_FILL → FILLED, with CANCELLED
/// reachable from NEW/PARTIAL_FILL and REJECTED only from NEW.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Order has been accepted but has no fills yet
    #[serde(rename(serialize = "NEW"))]
    #[serde(alias = "new", alias = "New", alias = "NEW")]
    New,

    /// Order has been partially filled
    #[serde(rename(serialize = "PARTIAL_FILL"))]
    #[serde(alias = "partial_fill", alias = "PartialFill", alias = "PARTIAL_FILL")]
    PartialFill,

    /// Order has been completely filled
    #[serde(rename(serialize = "FILLED"))]
    #[serde(alias = "filled", alias = "Filled", alias = "FILLED")]
    Filled,

    /// Order has been cancelled (explicitly, or as an unfilled residual)
    #[serde(rename(serialize = "CANCELLED"))]
    #[serde(alias = "cancelled", alias = "Cancelled", alias = "CANCELLED")]
    Cancelled,

    /// Order has been rejected and produced no fills
    #[serde(rename(serialize = "REJECTED"))]
    #[serde(alias = "rejected", alias = "Rejected", alias = "REJECTED")]
    Rejected,
}

impl OrderStatus {
    /// Returns true if the order can still trade or rest on the book
    pub fn is_active(&self) -> bool {
        matches!(self, Self::New | Self::PartialFill)
    }

    /// Returns true if the order has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Filled | Self::Cancelled | Self::Rejected)
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NEW" => Ok(OrderStatus::New),
            "PARTIAL_FILL" => Ok(OrderStatus::PartialFill),
            "FILLED" => Ok(OrderStatus::Filled),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            "REJECTED" => Ok(OrderStatus::Rejected),
            _ => Err(OrderError::ParseError {
                message: format!("invalid order status: {s}"),
            }),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::New => write!(f, "NEW"),
            OrderStatus::PartialFill => write!(f, "PARTIAL_FILL"),
            OrderStatus::Filled => write!(f, "FILLED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
            OrderStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}
