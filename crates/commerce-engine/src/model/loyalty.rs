//! Loyalty points and the discount they unlock.

use super::UserId;
use rust_decimal::Decimal;

/// Points awarded per hour of recorded activity.
pub const POINTS_PER_HOUR: u64 = 25;

/// Points at which the discount reaches its cap.
pub const POINTS_FOR_MAX_DISCOUNT: u64 = 100_000;

/// The largest discount, in percent.
pub const MAX_DISCOUNT_PERCENT: u32 = 90;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoyaltyAccount {
    pub user: UserId,
    pub points: u64,
}

impl LoyaltyAccount {
    pub fn new(user: UserId, points: u64) -> Self {
        Self { user, points }
    }
}

/// Discount percentage for a points balance: `points / 100000 × 90`, clamped to `0..=90`.
///
/// Negative balances are treated as zero.
pub fn discount_percent(points: i64) -> Decimal {
    let ratio = Decimal::from(points.max(0)) / Decimal::from(POINTS_FOR_MAX_DISCOUNT);
    let percent = ratio * Decimal::from(MAX_DISCOUNT_PERCENT);
    percent.clamp(Decimal::ZERO, Decimal::from(MAX_DISCOUNT_PERCENT))
}
