//! Orders as submitted, acknowledged and remembered locally.

use super::{ProductId, ResolvedLine, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt::Display;

/// One purchased product, priced at the moment of checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl OrderLine {
    pub fn new(product_id: ProductId, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            product_id,
            quantity,
            unit_price,
            subtotal: unit_price * Decimal::from(quantity),
        }
    }
}

impl From<&ResolvedLine> for OrderLine {
    fn from(line: &ResolvedLine) -> Self {
        OrderLine::new(line.product.id, line.quantity, line.product.price)
    }
}

/// Snapshot of a cart handed to the order service.
///
/// `total` is always the sum of the line subtotals.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub client_id: UserId,
    pub lines: Vec<OrderLine>,
    pub total: Decimal,
}

impl Order {
    pub fn new(client_id: UserId, lines: Vec<OrderLine>) -> Self {
        let total = lines.iter().map(|l| l.subtotal).sum();
        Self {
            client_id,
            lines,
            total,
        }
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// What the order service answered for a submitted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAck {
    pub remote_id: String,
    pub status: String,
}

/// Local handle for an order attempt, allocated before the remote id is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderRef(pub u64);

impl Display for OrderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Outcome of an order attempt as far as this client knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStatus {
    /// Submitted, no answer yet.
    Pending,
    /// The service acknowledged the order.
    Confirmed(OrderAck),
    /// The attempt failed in a way that does not prove the service dropped it.
    Uncertain { reason: String },
    /// The service refused the order outright.
    Rejected { reason: String },
}

impl OrderStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, OrderStatus::Confirmed(_))
    }
}

/// A local order-history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub reference: OrderRef,
    pub order: Order,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
}

/// An order as listed by the order service.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteOrder {
    pub id: String,
    pub client_id: UserId,
    pub total: Decimal,
    pub summary: String,
    pub status: String,
}

/// A user's orders: what the service reports plus local attempts it has not confirmed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderHistory {
    pub remote: Vec<RemoteOrder>,
    pub unconfirmed: Vec<OrderRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_total_is_sum_of_subtotals() {
        let user = UserId::parse("ana@shop.test").unwrap();
        let order = Order::new(
            user,
            vec![
                OrderLine::new(ProductId(1), 2, dec!(49990)),
                OrderLine::new(ProductId(7), 3, dec!(15990)),
            ],
        );
        assert_eq!(order.lines[0].subtotal, dec!(99980));
        assert_eq!(order.total, dec!(147950));
        assert_eq!(order.item_count(), 5);
    }
}
