//! The built-in catalog shown when the product service cannot be reached.

use crate::model::{Category, ImageRef, Product, ProductId};
use rust_decimal::Decimal;

fn item(
    id: u64,
    name: &str,
    description: &str,
    price: i64,
    stock: u32,
    image: &str,
    category: Category,
) -> Product {
    Product {
        id: ProductId(id),
        name: name.to_string(),
        description: description.to_string(),
        price: Decimal::from(price),
        stock,
        category,
        image: Some(ImageRef::Bundled(image.to_string())),
    }
}

/// Twelve bundled products across the `GAMING` and `PHONES` categories.
pub fn fallback_catalog() -> Vec<Product> {
    let gaming = Category::gaming;
    let phones = Category::phones;
    vec![
        item(1, "Logitech G502 Hero", "HERO 25K sensor", 49990, 15, "mouse", gaming()),
        item(2, "Redragon Keyboard", "Mechanical TKL", 32990, 8, "keyboard", gaming()),
        item(5, "HyperX Headset", "7.1 surround", 85990, 10, "headset", gaming()),
        item(6, "ASUS TUF Monitor", "165Hz, 1ms", 249990, 4, "monitor", gaming()),
        item(7, "SteelSeries Mousepad", "Micro-woven cloth", 15990, 20, "mousepad", gaming()),
        item(8, "Corsair Gaming Chair", "Ergonomic", 299990, 2, "chair", gaming()),
        item(3, "iPhone 15 128GB", "A16 chip", 799990, 5, "iphone", phones()),
        item(4, "Galaxy S24 Ultra", "QHD+ and S-Pen", 1199990, 3, "samsung", phones()),
        item(10, "Pixel 8 Pro", "Google AI", 899990, 4, "pixel", phones()),
        item(11, "Moto Edge 40", "Curved display", 279990, 7, "motorola", phones()),
        item(12, "Nothing Phone (2)", "Glyph Interface", 549990, 6, "nothing", phones()),
        item(13, "Xiaomi 13T Pro", "Leica lens", 599990, 9, "xiaomi", phones()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fallback_catalog_is_well_formed() {
        let catalog = fallback_catalog();
        assert_eq!(catalog.len(), 12);

        let ids: HashSet<ProductId> = catalog.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 12);
        assert!(catalog.iter().all(|p| p.validate().is_ok()));
        assert_eq!(
            catalog.iter().filter(|p| p.category == Category::phones()).count(),
            6
        );
    }
}
