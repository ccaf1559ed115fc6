//! Pricing rules
//!
//! Everything in this module is pure: no storage, no clock reads. Money is
//! always an `i64` number of cents and percentages are basis points
//! (`1000` = 10%).

mod cart;
mod coupon;
mod iptv;
mod quantity;

use rust_decimal::Decimal;
use thiserror::Error;

pub use cart::{CartItem, CartLineQuote, CartQuote, quote_cart};
pub use coupon::{PromotionRejection, PromotionStatus, is_expired};
pub use iptv::{
    IPTV_MAX_DEVICES, IptvPlan, IptvPriceRow, IptvQuote, iptv_price_cents, iptv_price_matrix,
    quote_iptv,
};
pub use quantity::{MAX_QUANTITY, PriceQuote, quantity_discount_bps, quote_quantity};

/// 10000 bps = 100%
pub const BPS_SCALE: i64 = 10_000;

/// Highest unit price the catalog accepts, $1,000,000
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("quantity must be between 1 and {max}, got {got}")]
    InvalidQuantity { got: u32, max: u32 },
    #[error("price must not be negative, got {0}")]
    NegativePrice(i64),
    #[error("price must not exceed {max} cents, got {got}")]
    PriceTooLarge { got: i64, max: i64 },
    #[error("device count must be between 1 and {max}, got {got}")]
    InvalidDeviceCount { got: u32, max: u32 },
    #[error("unknown IPTV plan: {0}")]
    UnknownPlan(String),
    #[error("cart is empty")]
    EmptyCart,
}

/// `amount × bps / 10000`, rounded half away from zero
pub fn apply_bps(amount_cents: i64, bps: i64) -> i64 {
    round_div(amount_cents as i128 * bps as i128, BPS_SCALE as i128)
}

/// Integer division rounding half away from zero. `divisor` must be positive.
pub(crate) fn round_div(numerator: i128, divisor: i128) -> i64 {
    let half = divisor / 2;
    let rounded = if numerator >= 0 {
        (numerator + half) / divisor
    } else {
        -((-numerator + half) / divisor)
    };
    rounded as i64
}

/// Reject prices outside `0..=MAX_PRICE_CENTS`
pub fn check_unit_price(cents: i64) -> Result<(), PricingError> {
    if cents < 0 {
        return Err(PricingError::NegativePrice(cents));
    }
    if cents > MAX_PRICE_CENTS {
        return Err(PricingError::PriceTooLarge {
            got: cents,
            max: MAX_PRICE_CENTS,
        });
    }
    Ok(())
}

/// Render cents as a plain dollar string, e.g. `4999` → `"49.99"`
pub fn format_cents(cents: i64) -> String {
    Decimal::new(cents, 2).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_bps_rounds_half_away_from_zero() {
        // 4999 * 0.9 = 4499.1
        assert_eq!(apply_bps(4999, 9000), 4499);
        // 4999 * 0.85 = 4249.15
        assert_eq!(apply_bps(4999, 8500), 4249);
        // 15 * 0.5 = 7.5 → 8
        assert_eq!(apply_bps(15, 5000), 8);
        assert_eq!(apply_bps(-15, 5000), -8);
        assert_eq!(apply_bps(0, 1500), 0);
    }

    #[test]
    fn test_check_unit_price_bounds() {
        assert!(check_unit_price(0).is_ok());
        assert!(check_unit_price(MAX_PRICE_CENTS).is_ok());
        assert_eq!(check_unit_price(-1), Err(PricingError::NegativePrice(-1)));
        assert_eq!(
            check_unit_price(MAX_PRICE_CENTS + 1),
            Err(PricingError::PriceTooLarge {
                got: MAX_PRICE_CENTS + 1,
                max: MAX_PRICE_CENTS
            })
        );
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(4999), "49.99");
        assert_eq!(format_cents(5000), "50.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-150), "-1.50");
    }
}
