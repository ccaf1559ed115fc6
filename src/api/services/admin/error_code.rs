//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::StoreError;
use crate::pricing::{PricingError, PromotionRejection};

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 商品与计价错误
/// - 4000-4099: 营销错误（优惠码、推广）
/// - 5000-5099: 内容错误（博客、评价、跳转）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenExpired = 2001,
    TokenInvalid = 2002,
    RateLimitExceeded = 2004,

    // 商品与计价错误 3000-3099
    ProductNotFound = 3000,
    InvalidQuantity = 3001,
    InvalidDeviceCount = 3002,
    UnknownPlan = 3003,
    EmptyCart = 3004,
    NegativePrice = 3005,
    PriceTooLarge = 3006,

    // 营销错误 4000-4099
    PromotionNotFound = 4000,
    PromotionInactive = 4001,
    PromotionNotStarted = 4002,
    PromotionExpired = 4003,
    PromotionExhausted = 4004,
    PromotionBelowMinimum = 4005,
    AffiliateInactive = 4010,

    // 内容错误 5000-5099
    PostNotFound = 5000,
    ReviewRejected = 5001,
    RedirectInvalid = 5002,
}

impl From<&PricingError> for ErrorCode {
    fn from(err: &PricingError) -> Self {
        match err {
            PricingError::InvalidQuantity { .. } => ErrorCode::InvalidQuantity,
            PricingError::NegativePrice(_) => ErrorCode::NegativePrice,
            PricingError::PriceTooLarge { .. } => ErrorCode::PriceTooLarge,
            PricingError::InvalidDeviceCount { .. } => ErrorCode::InvalidDeviceCount,
            PricingError::UnknownPlan(_) => ErrorCode::UnknownPlan,
            PricingError::EmptyCart => ErrorCode::EmptyCart,
        }
    }
}

impl From<&PromotionRejection> for ErrorCode {
    fn from(reason: &PromotionRejection) -> Self {
        match reason {
            PromotionRejection::NotFound => ErrorCode::PromotionNotFound,
            PromotionRejection::Inactive => ErrorCode::PromotionInactive,
            PromotionRejection::NotStarted => ErrorCode::PromotionNotStarted,
            PromotionRejection::Expired => ErrorCode::PromotionExpired,
            PromotionRejection::Exhausted => ErrorCode::PromotionExhausted,
            PromotionRejection::BelowMinimum { .. } => ErrorCode::PromotionBelowMinimum,
        }
    }
}

impl From<&StoreError> for ErrorCode {
    fn from(err: &StoreError) -> Self {
        match err {
            StoreError::Validation(_) => ErrorCode::BadRequest,
            StoreError::NotFound(_) => ErrorCode::NotFound,
            StoreError::Conflict(_) => ErrorCode::Conflict,
            StoreError::Unauthorized(_) => ErrorCode::Unauthorized,
            StoreError::Pricing(e) => e.into(),
            StoreError::Promotion(reason) => reason.into(),
            StoreError::AffiliateInactive(_) => ErrorCode::AffiliateInactive,
            StoreError::InvalidRedirect(_) => ErrorCode::RedirectInvalid,
            StoreError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            StoreError::DatabaseConfig(_)
            | StoreError::DatabaseOperation(_)
            | StoreError::FileOperation(_)
            | StoreError::Serialization(_)
            | StoreError::Internal(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::PromotionExpired).unwrap();
        assert_eq!(json, "4003");
        let parsed: ErrorCode = serde_json::from_str("3001").unwrap();
        assert_eq!(parsed, ErrorCode::InvalidQuantity);
    }

    #[test]
    fn test_store_error_mapping() {
        assert_eq!(
            ErrorCode::from(&StoreError::validation("x")),
            ErrorCode::BadRequest
        );
        assert_eq!(
            ErrorCode::from(&StoreError::conflict("x")),
            ErrorCode::Conflict
        );
        assert_eq!(
            ErrorCode::from(&StoreError::Promotion(PromotionRejection::BelowMinimum {
                min_purchase_cents: 5000
            })),
            ErrorCode::PromotionBelowMinimum
        );
        assert_eq!(
            ErrorCode::from(&StoreError::Pricing(PricingError::InvalidDeviceCount {
                got: 6,
                max: 5
            })),
            ErrorCode::InvalidDeviceCount
        );
        assert_eq!(
            ErrorCode::from(&StoreError::affiliate_inactive("AFF-1234")),
            ErrorCode::AffiliateInactive
        );
        assert_eq!(
            ErrorCode::from(&StoreError::invalid_redirect("/a")),
            ErrorCode::RedirectInvalid
        );
        assert_eq!(
            ErrorCode::from(&StoreError::Pricing(PricingError::PriceTooLarge {
                got: i64::MAX,
                max: 100_000_000
            })),
            ErrorCode::PriceTooLarge
        );
        assert_eq!(
            ErrorCode::from(&StoreError::database_operation("boom")),
            ErrorCode::InternalServerError
        );
    }
}
