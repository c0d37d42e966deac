use rust_decimal::Decimal;

/// Price breakdown for a cart at the current loyalty discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutQuote {
    pub subtotal: Decimal,
    /// Percent, `0..=90`.
    pub discount_percent: Decimal,
    pub discount: Decimal,
    /// `subtotal × (1 − percent / 100)`, rounded to cents.
    pub payable: Decimal,
}

impl CheckoutQuote {
    pub fn new(subtotal: Decimal, discount_percent: Decimal) -> Self {
        let factor = Decimal::ONE - discount_percent / Decimal::ONE_HUNDRED;
        let payable = (subtotal * factor).round_dp(2);
        Self {
            subtotal,
            discount_percent,
            discount: subtotal - payable,
            payable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_no_discount() {
        let quote = CheckoutQuote::new(dec!(250), Decimal::ZERO);
        assert_eq!(quote.payable, dec!(250));
        assert_eq!(quote.discount, Decimal::ZERO);
    }

    #[test]
    fn test_discount_rounds_to_cents() {
        // 100 points -> 0.09%
        let quote = CheckoutQuote::new(dec!(49990), dec!(0.09));
        assert_eq!(quote.payable, dec!(49945.01));
        assert_eq!(quote.discount, dec!(44.99));
        assert_eq!(quote.discount + quote.payable, quote.subtotal);
    }
}
