//! Promotion (coupon) service

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::{Result, StoreError};
use crate::pricing::{BPS_SCALE, CartQuote, PromotionRejection, PromotionStatus};
use crate::storage::{DiscountType, Paged, Promotion, PromotionDraft, SeaOrmStorage};

const MAX_CODE_LEN: usize = 32;

/// Outcome of checking a code against a subtotal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CouponCheck {
    pub code: String,
    pub discount_type: DiscountType,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
}

pub struct PromotionService {
    storage: Arc<SeaOrmStorage>,
}

impl PromotionService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn list(
        &self,
        search: &Option<String>,
        page: u64,
        page_size: u64,
    ) -> Result<Paged<Promotion>> {
        self.storage.list_promotions(search, page, page_size).await
    }

    pub async fn get(&self, id: i32) -> Result<Promotion> {
        self.storage
            .get_promotion(id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("Promotion not found: {}", id)))
    }

    pub async fn save(&self, id: Option<i32>, draft: PromotionDraft) -> Result<Promotion> {
        let draft = normalize_promotion_draft(draft)?;

        if let Some(existing) = self.storage.find_promotion_by_code(&draft.code).await?
            && Some(existing.id) != id
        {
            return Err(StoreError::conflict(format!(
                "Promotion code already exists: {}",
                draft.code
            )));
        }

        match id {
            None => self.storage.insert_promotion(&draft).await,
            Some(id) => self.storage.update_promotion(id, &draft).await,
        }
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        self.storage.delete_promotion(id).await
    }

    /// Check `code` against `subtotal_cents` without consuming a use
    pub async fn check(&self, code: &str, subtotal_cents: i64) -> Result<CouponCheck> {
        if subtotal_cents < 0 {
            return Err(StoreError::validation("Subtotal cannot be negative"));
        }
        let code = normalize_code(code);
        let promotion = self
            .storage
            .find_promotion_by_code(&code)
            .await?
            .ok_or(PromotionRejection::NotFound)?;

        let discount_cents = promotion.discount_for(subtotal_cents, Utc::now())?;
        Ok(CouponCheck {
            code: promotion.code,
            discount_type: promotion.discount_type,
            subtotal_cents,
            discount_cents,
            total_cents: subtotal_cents - discount_cents,
        })
    }

    /// Apply an optional coupon to a cart quote
    pub async fn apply_to_quote(&self, quote: CartQuote, code: Option<&str>) -> Result<CartQuote> {
        match code.map(str::trim).filter(|c| !c.is_empty()) {
            None => Ok(quote),
            Some(code) => {
                let check = self.check(code, quote.subtotal_cents).await?;
                Ok(quote.with_coupon(check.code, check.discount_cents))
            }
        }
    }

    /// Count one use of a live promotion
    pub async fn redeem(&self, id: i32) -> Result<Promotion> {
        let promotion = self.get(id).await?;
        match promotion.status_at(Utc::now()) {
            PromotionStatus::Live => {}
            PromotionStatus::Inactive => return Err(PromotionRejection::Inactive.into()),
            PromotionStatus::Scheduled => return Err(PromotionRejection::NotStarted.into()),
            PromotionStatus::Expired => return Err(PromotionRejection::Expired.into()),
            PromotionStatus::Exhausted => return Err(PromotionRejection::Exhausted.into()),
        }

        if !self.storage.increment_promotion_usage(id).await? {
            warn!("Promotion {} hit its usage limit during redemption", promotion.code);
            return Err(PromotionRejection::Exhausted.into());
        }

        let updated = self.get(id).await?;
        info!(
            "Promotion redeemed: {} ({}/{})",
            updated.code,
            updated.used_count,
            updated
                .max_uses
                .map(|m| m.to_string())
                .unwrap_or_else(|| "∞".to_string())
        );
        Ok(updated)
    }
}

/// Codes are case-insensitive: trimmed and upper-cased
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub fn normalize_promotion_draft(draft: PromotionDraft) -> Result<PromotionDraft> {
    let code = normalize_code(&draft.code);
    if code.is_empty() {
        return Err(StoreError::validation("Promotion code cannot be empty"));
    }
    if code.len() > MAX_CODE_LEN {
        return Err(StoreError::validation(format!(
            "Promotion code is longer than {} characters",
            MAX_CODE_LEN
        )));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(StoreError::validation(format!(
            "Promotion code may only contain letters, digits, '-' and '_': {}",
            code
        )));
    }

    match draft.discount_type {
        DiscountType::Percentage if !(1..=BPS_SCALE).contains(&draft.value) => {
            return Err(StoreError::validation(format!(
                "Percentage value must be between 1 and {} basis points",
                BPS_SCALE
            )));
        }
        DiscountType::Fixed if draft.value <= 0 => {
            return Err(StoreError::validation(
                "Fixed discount must be a positive amount of cents",
            ));
        }
        _ => {}
    }

    if draft.min_purchase_cents < 0 {
        return Err(StoreError::validation("Minimum purchase cannot be negative"));
    }
    if draft.max_uses.is_some_and(|m| m < 1) {
        return Err(StoreError::validation("Max uses must be at least 1"));
    }
    if let (Some(start), Some(end)) = (draft.starts_at, draft.ends_at)
        && end <= start
    {
        return Err(StoreError::validation("End date must be after start date"));
    }

    Ok(PromotionDraft { code, ..draft })
}
