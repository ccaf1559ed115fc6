//! Coupon rules for promotions

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::AsRefStr;
use thiserror::Error;

use super::apply_bps;
use crate::storage::{DiscountType, Promotion};

/// A promotion without an end date never expires.
pub fn is_expired(ends_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    ends_at.is_some_and(|end| end < now)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PromotionStatus {
    Inactive,
    Scheduled,
    Expired,
    Exhausted,
    Live,
}

/// Why a coupon cannot be applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromotionRejection {
    #[error("promotion code not found")]
    NotFound,
    #[error("promotion is not active")]
    Inactive,
    #[error("promotion has not started yet")]
    NotStarted,
    #[error("promotion has expired")]
    Expired,
    #[error("promotion usage limit reached")]
    Exhausted,
    #[error("order subtotal must be at least {min_purchase_cents} cents")]
    BelowMinimum { min_purchase_cents: i64 },
}

impl PromotionRejection {
    /// Stable machine-readable reason
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Inactive => "inactive",
            Self::NotStarted => "not_started",
            Self::Expired => "expired",
            Self::Exhausted => "exhausted",
            Self::BelowMinimum { .. } => "below_minimum",
        }
    }
}

impl Promotion {
    pub fn status_at(&self, now: DateTime<Utc>) -> PromotionStatus {
        if !self.active {
            PromotionStatus::Inactive
        } else if is_expired(self.ends_at, now) {
            PromotionStatus::Expired
        } else if self.starts_at.is_some_and(|start| start > now) {
            PromotionStatus::Scheduled
        } else if self.max_uses.is_some_and(|max| self.used_count >= max) {
            PromotionStatus::Exhausted
        } else {
            PromotionStatus::Live
        }
    }

    /// Discount in cents this promotion grants on `subtotal_cents`.
    pub fn discount_for(
        &self,
        subtotal_cents: i64,
        now: DateTime<Utc>,
    ) -> Result<i64, PromotionRejection> {
        match self.status_at(now) {
            PromotionStatus::Inactive => return Err(PromotionRejection::Inactive),
            PromotionStatus::Scheduled => return Err(PromotionRejection::NotStarted),
            PromotionStatus::Expired => return Err(PromotionRejection::Expired),
            PromotionStatus::Exhausted => return Err(PromotionRejection::Exhausted),
            PromotionStatus::Live => {}
        }

        if subtotal_cents < self.min_purchase_cents {
            return Err(PromotionRejection::BelowMinimum {
                min_purchase_cents: self.min_purchase_cents,
            });
        }

        let discount = match self.discount_type {
            DiscountType::Percentage => apply_bps(subtotal_cents, self.value),
            DiscountType::Fixed => self.value,
        };
        Ok(discount.clamp(0, subtotal_cents.max(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn promotion(discount_type: DiscountType, value: i64) -> Promotion {
        let now = Utc::now();
        Promotion {
            id: 1,
            code: "SAVE10".to_string(),
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

    #[test]
    fn test_is_expired() {
        let now = Utc::now();
        assert!(!is_expired(None, now));
        assert!(is_expired(Some(now - Duration::seconds(1)), now));
        assert!(!is_expired(Some(now + Duration::days(1)), now));
        // 截止时刻本身仍然有效
        assert!(!is_expired(Some(now), now));
    }

    #[test]
    fn test_status_precedence() {
        let now = Utc::now();
        let mut promo = promotion(DiscountType::Percentage, 1000);
        assert_eq!(promo.status_at(now), PromotionStatus::Live);

        promo.max_uses = Some(3);
        promo.used_count = 3;
        assert_eq!(promo.status_at(now), PromotionStatus::Exhausted);

        promo.starts_at = Some(now + Duration::hours(1));
        assert_eq!(promo.status_at(now), PromotionStatus::Scheduled);

        promo.ends_at = Some(now - Duration::hours(1));
        assert_eq!(promo.status_at(now), PromotionStatus::Expired);

        promo.active = false;
        assert_eq!(promo.status_at(now), PromotionStatus::Inactive);
    }

    #[test]
    fn test_percentage_discount() {
        let promo = promotion(DiscountType::Percentage, 1000);
        assert_eq!(promo.discount_for(8998, Utc::now()), Ok(900));
    }

    #[test]
    fn test_fixed_discount_capped_at_subtotal() {
        let promo = promotion(DiscountType::Fixed, 2500);
        assert_eq!(promo.discount_for(10000, Utc::now()), Ok(2500));
        assert_eq!(promo.discount_for(1500, Utc::now()), Ok(1500));
    }

    #[test]
    fn test_minimum_purchase() {
        let mut promo = promotion(DiscountType::Fixed, 500);
        promo.min_purchase_cents = 5000;
        assert_eq!(
            promo.discount_for(4999, Utc::now()),
            Err(PromotionRejection::BelowMinimum {
                min_purchase_cents: 5000
            })
        );
        assert_eq!(promo.discount_for(5000, Utc::now()), Ok(500));
    }

    #[test]
    fn test_rejection_reasons() {
        let now = Utc::now();
        let mut promo = promotion(DiscountType::Fixed, 500);
        promo.ends_at = Some(now - Duration::days(1));
        let err = promo.discount_for(1000, now).unwrap_err();
        assert_eq!(err, PromotionRejection::Expired);
        assert_eq!(err.reason(), "expired");
    }
}
