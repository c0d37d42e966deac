//! Custom actions for the catalog actor.

use crate::model::Product;

/// Operations on a single catalog entry beyond CRUD.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Reads the current stock without changing it.
    CheckStock,
    /// Records a sale of `u32` units. Stock is floored at zero, never rejected.
    DecrementStock(u32),
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone)]
pub enum ProductActionResult {
    CheckStock(u32),
    /// The entry after the decrement.
    DecrementStock(Product),
}
