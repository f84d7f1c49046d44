//! Order-model validation and parse errors.

use std::fmt;

/// Errors raised while constructing or parsing order-model values.
///
/// Construction failures are synchronous: an order that fails validation
/// never reaches the book.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OrderError {
    /// A limit order was built without a price.
    MissingPrice,

    /// A market order was given a price.
    UnexpectedPrice,

    /// The limit price is zero.
    InvalidPrice,

    /// The order quantity is zero.
    InvalidQuantity,

    /// String conversion failed.
    ParseError {
        /// Description of the parse failure.
        message: String,
    },
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::MissingPrice => write!(f, "limit orders must have a price"),
            OrderError::UnexpectedPrice => write!(f, "market orders cannot have a price"),
            OrderError::InvalidPrice => write!(f, "limit price must be positive"),
            OrderError::InvalidQuantity => write!(f, "order quantity must be positive"),
            OrderError::ParseError { message } => write!(f, "parse error: {message}"),
        }
    }
}

impl std::error::Error for OrderError {}
