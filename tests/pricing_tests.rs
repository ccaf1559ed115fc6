//! Pricing rule tests
//!
//! Quantity tiers, the IPTV table and cart totals, with no storage.

use chrono::{Duration, Utc};

use storefront::pricing::{
    CartItem, IptvPlan, MAX_PRICE_CENTS, PricingError, PromotionRejection, PromotionStatus,
    iptv_price_cents, iptv_price_matrix, quote_cart, quote_iptv, quote_quantity,
};
use storefront::storage::{DiscountType, Promotion};

fn promotion(discount_type: DiscountType, value: i64) -> Promotion {
    let now = Utc::now();
    Promotion {
        id: 1,
        code: "WELCOME".to_string(),
        discount_type,
        value,
        min_purchase_cents: 0,
        max_uses: None,
        used_count: 0,
        starts_at: None,
        ends_at: None,
        active: true,
        created_at: now,
        updated_at: now,
    }
}

// =============================================================================
// Quantity tiers
// =============================================================================

#[test]
fn test_single_unit_has_no_discount() {
    let quote = quote_quantity(4999, 1).unwrap();
    assert_eq!(quote.discount_bps, 0);
    assert_eq!(quote.unit_cents, 4999);
    assert_eq!(quote.total_cents, 4999);
    assert_eq!(quote.savings_cents, 0);
}

#[test]
fn test_two_units_get_ten_percent() {
    let quote = quote_quantity(4999, 2).unwrap();
    assert_eq!(quote.discount_bps, 1000);
    assert_eq!(quote.unit_cents, 4499);
    assert_eq!(quote.total_cents, 8998);
    assert_eq!(quote.savings_cents, 1000);
}

#[test]
fn test_three_or_more_units_get_fifteen_percent() {
    for quantity in 3..=5 {
        let quote = quote_quantity(4999, quantity).unwrap();
        assert_eq!(quote.discount_bps, 1500);
        assert_eq!(quote.unit_cents, 4249);
        assert_eq!(quote.total_cents, 4249 * quantity as i64);
    }
}

#[test]
fn test_quantity_bounds() {
    assert!(matches!(
        quote_quantity(4999, 0),
        Err(PricingError::InvalidQuantity { got: 0, .. })
    ));
    assert!(matches!(
        quote_quantity(4999, 6),
        Err(PricingError::InvalidQuantity { got: 6, max: 5 })
    ));
    assert_eq!(
        quote_quantity(-1, 1),
        Err(PricingError::NegativePrice(-1))
    );
}

#[test]
fn test_huge_unit_price_is_an_error_not_a_panic() {
    assert!(matches!(
        quote_quantity(i64::MAX / 2, 3),
        Err(PricingError::PriceTooLarge { .. })
    ));
    assert!(matches!(
        quote_quantity(MAX_PRICE_CENTS + 1, 1),
        Err(PricingError::PriceTooLarge { .. })
    ));
    assert!(quote_quantity(MAX_PRICE_CENTS, 5).is_ok());
}

#[test]
fn test_free_item_stays_free() {
    let quote = quote_quantity(0, 4).unwrap();
    assert_eq!(quote.total_cents, 0);
    assert_eq!(quote.savings_cents, 0);
}

// =============================================================================
// IPTV plans
// =============================================================================

#[test]
fn test_iptv_table_lookup() {
    assert_eq!(iptv_price_cents(IptvPlan::OneMonth, 1).unwrap(), 1500);
    assert_eq!(iptv_price_cents(IptvPlan::ThreeMonths, 2).unwrap(), 5500);
    assert_eq!(iptv_price_cents(IptvPlan::SixMonths, 5).unwrap(), 15500);
    assert_eq!(iptv_price_cents(IptvPlan::OneYear, 3).unwrap(), 14000);
}

#[test]
fn test_iptv_device_bounds() {
    for devices in [0, 6] {
        assert!(matches!(
            quote_iptv(IptvPlan::OneYear, devices),
            Err(PricingError::InvalidDeviceCount { .. })
        ));
    }
}

#[test]
fn test_iptv_plan_parsing() {
    assert_eq!("1mo".parse::<IptvPlan>().unwrap(), IptvPlan::OneMonth);
    assert_eq!(" 1YR ".parse::<IptvPlan>().unwrap(), IptvPlan::OneYear);
    assert_eq!(
        "2yr".parse::<IptvPlan>(),
        Err(PricingError::UnknownPlan("2yr".to_string()))
    );
}

#[test]
fn test_iptv_quote_per_device() {
    let quote = quote_iptv(IptvPlan::OneYear, 4).unwrap();
    assert_eq!(quote.total_cents, 17000);
    assert_eq!(quote.per_device_cents, 4250);
    assert_eq!(quote.months, 12);
    assert!(quote.savings_cents > 0);
}

#[test]
fn test_iptv_matrix_is_monotonic() {
    let matrix = iptv_price_matrix();
    assert_eq!(matrix.len(), 4);
    for row in &matrix {
        assert_eq!(row.prices_cents.len(), 5);
        assert!(row.prices_cents.windows(2).all(|w| w[0] < w[1]));
    }
}

// =============================================================================
// Carts and coupons
// =============================================================================

#[test]
fn test_cart_applies_tiers_per_line() {
    let quote = quote_cart(&[
        CartItem {
            product_id: 1,
            name: "Fire Stick 4K".into(),
            base_unit_cents: 4999,
            quantity: 2,
        },
        CartItem {
            product_id: 2,
            name: "Remote".into(),
            base_unit_cents: 1000,
            quantity: 1,
        },
    ])
    .unwrap();

    assert_eq!(quote.lines.len(), 2);
    assert_eq!(quote.subtotal_cents, 8998 + 1000);
    assert_eq!(quote.quantity_savings_cents, 1000);
    assert_eq!(quote.coupon_discount_cents, 0);
    assert_eq!(quote.grand_total_cents, quote.subtotal_cents);
}

#[test]
fn test_empty_cart_is_rejected() {
    assert_eq!(quote_cart(&[]).unwrap_err(), PricingError::EmptyCart);
}

#[test]
fn test_coupon_reduces_grand_total() {
    let quote = quote_cart(&[CartItem {
        product_id: 1,
        name: "Fire Stick".into(),
        base_unit_cents: 3999,
        quantity: 1,
    }])
    .unwrap()
    .with_coupon("SAVE5", 500);

    assert_eq!(quote.coupon_code.as_deref(), Some("SAVE5"));
    assert_eq!(quote.grand_total_cents, 3499);
}

#[test]
fn test_percentage_and_fixed_discounts() {
    let now = Utc::now();
    assert_eq!(
        promotion(DiscountType::Percentage, 1000)
            .discount_for(4999, now)
            .unwrap(),
        500
    );
    // Fixed discounts never push the total below zero
    assert_eq!(
        promotion(DiscountType::Fixed, 10_000)
            .discount_for(4999, now)
            .unwrap(),
        4999
    );
}

#[test]
fn test_promotion_status_order() {
    let now = Utc::now();

    let mut p = promotion(DiscountType::Fixed, 100);
    assert_eq!(p.status_at(now), PromotionStatus::Live);

    p.max_uses = Some(2);
    p.used_count = 2;
    assert_eq!(p.status_at(now), PromotionStatus::Exhausted);
    assert_eq!(p.discount_for(1000, now), Err(PromotionRejection::Exhausted));

    p.starts_at = Some(now + Duration::days(1));
    assert_eq!(p.status_at(now), PromotionStatus::Scheduled);

    p.ends_at = Some(now - Duration::days(1));
    assert_eq!(p.status_at(now), PromotionStatus::Expired);

    p.active = false;
    assert_eq!(p.status_at(now), PromotionStatus::Inactive);
}

#[test]
fn test_minimum_purchase() {
    let mut p = promotion(DiscountType::Fixed, 500);
    p.min_purchase_cents = 5000;
    assert_eq!(
        p.discount_for(4999, Utc::now()),
        Err(PromotionRejection::BelowMinimum {
            min_purchase_cents: 5000
        })
    );
    assert_eq!(p.discount_for(5000, Utc::now()), Ok(500));
}
