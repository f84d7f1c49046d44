use crate::order::{OrderId, OrderStatus, Trade};
use crate::units::Qty;

/// Outcome of a single [`crate::OrderBook::add_order`] call.
///
/// Carries the ordered list of trades the call generated together with the
/// submitted order's final disposition, so callers keep full visibility
/// into IOC residual cancellation and FOK rejection without sharing the
/// order itself.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// Id of the submitted order.
    pub order_id: OrderId,
    /// Final status of the submitted order after this call.
    pub status: OrderStatus,
    /// Quantity executed by this call.
    pub executed_quantity: Qty,
    /// Quantity left unexecuted (resting, cancelled, or rejected).
    pub remaining_quantity: Qty,
    /// Trades generated by this call, in execution order.
    pub trades: Vec<Trade>,
}

impl ExecutionReport {
    /// True when the submitted order executed in full.
    pub fn is_complete(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    pub fn fill_count(&self) -> usize {
        self.trades.len()
    }
}
