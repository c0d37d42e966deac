//! Catalog products.
//!
//! `Product` implements [`ActorEntity`](commerce_actor::ActorEntity) in
//! [`crate::catalog_actor`], which keeps the catalog ordered by [`ProductId`].
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// Type-safe identifier for Products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub u64);

impl ProductId {
    /// The id after this one; local ids are allocated as `max + 1`.
    /// `None` past `u64::MAX`.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "product_{}", self.0)
    }
}

/// Upper-case category tag such as `GAMING` or `PHONES`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Category(String);

impl Category {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_uppercase())
    }

    pub fn gaming() -> Self {
        Self::new("GAMING")
    }

    pub fn phones() -> Self {
        Self::new("PHONES")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a product's picture comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageRef {
    /// An asset shipped with the app, by name.
    Bundled(String),
    /// A remote or content URI.
    Uri(String),
}

impl ImageRef {
    const BUNDLED_PREFIX: &'static str = "res:";

    /// Reads the single string form used on the wire. Blank means no image.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match raw.strip_prefix(Self::BUNDLED_PREFIX) {
            Some(name) => ImageRef::Bundled(name.to_string()),
            None => ImageRef::Uri(raw.to_string()),
        })
    }

    pub fn to_wire(&self) -> String {
        match self {
            ImageRef::Bundled(name) => format!("{}{name}", Self::BUNDLED_PREFIX),
            ImageRef::Uri(uri) => uri.clone(),
        }
    }
}

/// Reasons a product cannot enter the catalog.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InvalidProduct {
    #[error("Price must not be negative: {0}")]
    NegativePrice(Decimal),

    #[error("Product name must not be blank")]
    BlankName,
}

/// A sellable item in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: u32,
    pub category: Category,
    pub image: Option<ImageRef>,
}

impl Product {
    /// Builds a product from a draft under the given id.
    pub fn from_draft(id: ProductId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            stock: draft.stock,
            category: draft.category,
            image: draft.image,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidProduct> {
        validate_fields(&self.name, self.price)
    }

    /// Stock after selling `quantity`, floored at zero.
    pub fn stock_after_sale(&self, quantity: u32) -> u32 {
        self.stock.saturating_sub(quantity)
    }

    pub fn is_low_stock(&self, threshold: u32) -> bool {
        self.stock < threshold
    }

    /// Case-insensitive name match; a blank query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

fn validate_fields(name: &str, price: Decimal) -> Result<(), InvalidProduct> {
    if name.trim().is_empty() {
        return Err(InvalidProduct::BlankName);
    }
    if price.is_sign_negative() && !price.is_zero() {
        return Err(InvalidProduct::NegativePrice(price));
    }
    Ok(())
}

/// A product without an id: what an admin fills in before saving.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: u32,
    pub category: Category,
    pub image: Option<ImageRef>,
}

impl ProductDraft {
    pub fn validate(&self) -> Result<(), InvalidProduct> {
        validate_fields(&self.name, self.price)
    }
}

/// Partial edit of a catalog entry.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn draft(name: &str, price: Decimal) -> ProductDraft {
        ProductDraft {
            name: name.into(),
            description: String::new(),
            price,
            stock: 1,
            category: Category::new("gaming"),
            image: None,
        }
    }

    #[test]
    fn test_category_is_normalized() {
        assert_eq!(Category::new(" gaming "), Category::gaming());
        assert_eq!(Category::phones().to_string(), "PHONES");
    }

    #[test]
    fn test_image_ref_wire_form() {
        assert_eq!(ImageRef::parse("res:mouse"), Some(ImageRef::Bundled("mouse".into())));
        assert_eq!(
            ImageRef::parse("content://media/42"),
            Some(ImageRef::Uri("content://media/42".into()))
        );
        assert_eq!(ImageRef::parse("   "), None);
        assert_eq!(ImageRef::Bundled("chair".into()).to_wire(), "res:chair");
    }

    #[test]
    fn test_draft_validation() {
        assert!(draft("Mouse", dec!(0)).validate().is_ok());
        assert_eq!(
            draft("Mouse", dec!(-1)).validate(),
            Err(InvalidProduct::NegativePrice(dec!(-1)))
        );
        assert_eq!(draft("  ", dec!(5)).validate(), Err(InvalidProduct::BlankName));
    }

    #[test]
    fn test_stock_after_sale_floors_at_zero() {
        let product = Product::from_draft(ProductId(1), draft("Mouse", dec!(10)));
        assert_eq!(product.stock_after_sale(5), 0);
        assert!(product.is_low_stock(5));
    }

    #[test]
    fn test_matches_query_ignores_case() {
        let product = Product::from_draft(ProductId(1), draft("Logitech G502 Hero", dec!(10)));
        assert!(product.matches_query("g502"));
        assert!(product.matches_query(""));
        assert!(!product.matches_query("razer"));
    }
}
