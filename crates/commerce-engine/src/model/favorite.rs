use super::{ProductId, UserId};
use std::collections::BTreeSet;

/// The products one user has marked as favorite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteSet {
    pub user: UserId,
    pub products: BTreeSet<ProductId>,
}

impl FavoriteSet {
    pub fn empty(user: UserId) -> Self {
        Self {
            user,
            products: BTreeSet::new(),
        }
    }

    pub fn contains(&self, product: ProductId) -> bool {
        self.products.contains(&product)
    }

    /// Flips membership and returns whether `product` is a favorite afterwards.
    pub fn toggle(&mut self, product: ProductId) -> bool {
        if self.products.remove(&product) {
            false
        } else {
            self.products.insert(product);
            true
        }
    }
}
