//! Quantity discount pricing for physical devices

use serde::Serialize;

use super::{BPS_SCALE, MAX_PRICE_CENTS, PricingError, apply_bps, check_unit_price};

/// Largest quantity a single cart line may carry
pub const MAX_QUANTITY: u32 = 5;

/// Discount tier for a purchase quantity, in basis points.
///
/// 2 units earn 10%, 3 or more earn 15%. The tier applies to every unit,
/// not only to the units above the threshold.
pub fn quantity_discount_bps(quantity: u32) -> u32 {
    if quantity >= 3 {
        1500
    } else if quantity >= 2 {
        1000
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    pub quantity: u32,
    pub base_unit_cents: i64,
    pub discount_bps: u32,
    pub unit_cents: i64,
    pub total_cents: i64,
    pub savings_cents: i64,
}

/// Price `quantity` units of an item listed at `base_unit_cents`.
pub fn quote_quantity(base_unit_cents: i64, quantity: u32) -> Result<PriceQuote, PricingError> {
    check_unit_price(base_unit_cents)?;
    if quantity == 0 || quantity > MAX_QUANTITY {
        return Err(PricingError::InvalidQuantity {
            got: quantity,
            max: MAX_QUANTITY,
        });
    }

    let discount_bps = quantity_discount_bps(quantity);
    let unit_cents = apply_bps(base_unit_cents, BPS_SCALE - discount_bps as i64);
    let too_large = || PricingError::PriceTooLarge {
        got: base_unit_cents,
        max: MAX_PRICE_CENTS,
    };
    let total_cents = unit_cents.checked_mul(quantity as i64).ok_or_else(too_large)?;
    let list_cents = base_unit_cents
        .checked_mul(quantity as i64)
        .ok_or_else(too_large)?;
    let savings_cents = list_cents - total_cents;

    Ok(PriceQuote {
        quantity,
        base_unit_cents,
        discount_bps,
        unit_cents,
        total_cents,
        savings_cents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_tiers() {
        assert_eq!(quantity_discount_bps(1), 0);
        assert_eq!(quantity_discount_bps(2), 1000);
        assert_eq!(quantity_discount_bps(3), 1500);
        // 3 件以上封顶 15%
        assert_eq!(quantity_discount_bps(5), 1500);
        assert_eq!(quantity_discount_bps(0), 0);
    }

    #[test]
    fn test_single_unit_has_no_discount() {
        let quote = quote_quantity(4999, 1).unwrap();
        assert_eq!(quote.unit_cents, 4999);
        assert_eq!(quote.total_cents, 4999);
        assert_eq!(quote.savings_cents, 0);
    }

    #[test]
    fn test_two_units_ten_percent() {
        let quote = quote_quantity(4999, 2).unwrap();
        assert_eq!(quote.discount_bps, 1000);
        assert_eq!(quote.unit_cents, 4499);
        assert_eq!(quote.total_cents, 8998);
        assert_eq!(quote.savings_cents, 1000);
    }

    #[test]
    fn test_three_units_fifteen_percent_uniform() {
        let quote = quote_quantity(10000, 3).unwrap();
        assert_eq!(quote.unit_cents, 8500);
        assert_eq!(quote.total_cents, 25500);
        assert_eq!(quote.savings_cents, 4500);
    }

    #[test]
    fn test_five_units_keeps_top_tier() {
        let quote = quote_quantity(2000, 5).unwrap();
        assert_eq!(quote.discount_bps, 1500);
        assert_eq!(quote.unit_cents, 1700);
        assert_eq!(quote.total_cents, 8500);
    }

    #[test]
    fn test_zero_price_is_allowed() {
        let quote = quote_quantity(0, 3).unwrap();
        assert_eq!(quote.total_cents, 0);
        assert_eq!(quote.savings_cents, 0);
    }

    #[test]
    fn test_rejects_out_of_range_quantity() {
        assert_eq!(
            quote_quantity(4999, 0),
            Err(PricingError::InvalidQuantity { got: 0, max: 5 })
        );
        assert_eq!(
            quote_quantity(4999, 6),
            Err(PricingError::InvalidQuantity { got: 6, max: 5 })
        );
    }

    #[test]
    fn test_rejects_oversized_price_instead_of_overflowing() {
        assert_eq!(
            quote_quantity(i64::MAX / 2, 3),
            Err(PricingError::PriceTooLarge {
                got: i64::MAX / 2,
                max: MAX_PRICE_CENTS
            })
        );
        let quote = quote_quantity(MAX_PRICE_CENTS, MAX_QUANTITY).unwrap();
        assert_eq!(quote.total_cents, 425_000_000);
    }

    #[test]
    fn test_rejects_negative_price() {
        assert_eq!(
            quote_quantity(-1, 1),
            Err(PricingError::NegativePrice(-1))
        );
    }
}
