//! Cart quotes
//!
//! A quote prices every line with the quantity tiers, sums the lines and
//! optionally subtracts a coupon discount. Nothing is reserved or consumed.

use serde::Serialize;

use super::{MAX_PRICE_CENTS, PricingError, quote_quantity};

/// One line as priced from the catalog
#[derive(Debug, Clone)]
pub struct CartItem {
    pub product_id: i32,
    pub name: String,
    pub base_unit_cents: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineQuote {
    pub product_id: i32,
    pub name: String,
    pub quantity: u32,
    pub base_unit_cents: i64,
    pub discount_bps: u32,
    pub unit_cents: i64,
    pub line_total_cents: i64,
    pub savings_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartQuote {
    pub lines: Vec<CartLineQuote>,
    pub subtotal_cents: i64,
    pub quantity_savings_cents: i64,
    pub coupon_code: Option<String>,
    pub coupon_discount_cents: i64,
    pub grand_total_cents: i64,
}

pub fn quote_cart(items: &[CartItem]) -> Result<CartQuote, PricingError> {
    if items.is_empty() {
        return Err(PricingError::EmptyCart);
    }

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let quote = quote_quantity(item.base_unit_cents, item.quantity)?;
        lines.push(CartLineQuote {
            product_id: item.product_id,
            name: item.name.clone(),
            quantity: item.quantity,
            base_unit_cents: item.base_unit_cents,
            discount_bps: quote.discount_bps,
            unit_cents: quote.unit_cents,
            line_total_cents: quote.total_cents,
            savings_cents: quote.savings_cents,
        });
    }

    let mut subtotal_cents: i64 = 0;
    let mut quantity_savings_cents: i64 = 0;
    for line in &lines {
        subtotal_cents = subtotal_cents
            .checked_add(line.line_total_cents)
            .ok_or(PricingError::PriceTooLarge {
                got: line.line_total_cents,
                max: MAX_PRICE_CENTS,
            })?;
        quantity_savings_cents += line.savings_cents;
    }

    Ok(CartQuote {
        lines,
        subtotal_cents,
        quantity_savings_cents,
        coupon_code: None,
        coupon_discount_cents: 0,
        grand_total_cents: subtotal_cents,
    })
}

impl CartQuote {
    /// Apply an already validated coupon discount. The total never goes below zero.
    pub fn with_coupon(mut self, code: impl Into<String>, discount_cents: i64) -> Self {
        let discount = discount_cents.clamp(0, self.subtotal_cents);
        self.coupon_code = Some(code.into());
        self.coupon_discount_cents = discount;
        self.grand_total_cents = self.subtotal_cents - discount;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: i32, price: i64, quantity: u32) -> CartItem {
        CartItem {
            product_id,
            name: format!("Product {}", product_id),
            base_unit_cents: price,
            quantity,
        }
    }

    #[test]
    fn test_lines_priced_independently() {
        let quote = quote_cart(&[item(1, 4999, 2), item(2, 2999, 1)]).unwrap();
        assert_eq!(quote.lines[0].line_total_cents, 8998);
        assert_eq!(quote.lines[1].line_total_cents, 2999);
        assert_eq!(quote.subtotal_cents, 11997);
        assert_eq!(quote.quantity_savings_cents, 1000);
        assert_eq!(quote.grand_total_cents, 11997);
        assert!(quote.coupon_code.is_none());
    }

    #[test]
    fn test_empty_cart_rejected() {
        assert_eq!(quote_cart(&[]), Err(PricingError::EmptyCart));
    }

    #[test]
    fn test_invalid_line_rejected() {
        let err = quote_cart(&[item(1, 4999, 9)]).unwrap_err();
        assert!(matches!(err, PricingError::InvalidQuantity { got: 9, .. }));
    }

    #[test]
    fn test_oversized_line_price_rejected() {
        let err = quote_cart(&[item(1, 4999, 1), item(2, i64::MAX / 2, 3)]).unwrap_err();
        assert!(matches!(err, PricingError::PriceTooLarge { .. }));
    }

    #[test]
    fn test_coupon_never_goes_negative() {
        let quote = quote_cart(&[item(1, 1000, 1)])
            .unwrap()
            .with_coupon("BIGSALE", 5000);
        assert_eq!(quote.coupon_discount_cents, 1000);
        assert_eq!(quote.grand_total_cents, 0);
        assert_eq!(quote.coupon_code.as_deref(), Some("BIGSALE"));
    }
}
