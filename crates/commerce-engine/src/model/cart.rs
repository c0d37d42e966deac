use super::{Product, ProductId};
use rust_decimal::Decimal;

/// One product in the cart and how many of it.
///
/// The line stores only the product id; price and name are read from the
/// catalog whenever the cart is displayed or totalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// A cart line joined with its current catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLine {
    pub product: Product,
    pub quantity: u32,
}

impl ResolvedLine {
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Joins cart lines with the catalog. Lines whose product is gone are dropped.
pub fn resolve_lines(lines: &[CartLine], catalog: &[Product]) -> Vec<ResolvedLine> {
    lines
        .iter()
        .filter_map(|line| {
            catalog
                .iter()
                .find(|p| p.id == line.product_id)
                .map(|product| ResolvedLine {
                    product: product.clone(),
                    quantity: line.quantity,
                })
        })
        .collect()
}

/// Sum of `price × quantity` over the resolved lines.
pub fn cart_total(lines: &[ResolvedLine]) -> Decimal {
    lines.iter().map(ResolvedLine::subtotal).sum()
}
