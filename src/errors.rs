use actix_web::http::StatusCode;
use thiserror::Error;

use crate::pricing::{PricingError, PromotionRejection};

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Database Configuration Error: {0}")]
    DatabaseConfig(String),
    #[error("Database Connection Error: {0}")]
    DatabaseConnection(String),
    #[error("Database Operation Error: {0}")]
    DatabaseOperation(String),
    #[error("File Operation Error: {0}")]
    FileOperation(String),
    #[error("Validation Error: {0}")]
    Validation(String),
    #[error("Resource Not Found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Serialization Error: {0}")]
    Serialization(String),
    #[error("Pricing Error: {0}")]
    Pricing(#[from] PricingError),
    #[error("Promotion Rejected: {0}")]
    Promotion(#[from] PromotionRejection),
    #[error("Affiliate Inactive: {0}")]
    AffiliateInactive(String),
    #[error("Invalid Redirect: {0}")]
    InvalidRedirect(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Internal Error: {0}")]
    Internal(String),
}

impl StoreError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::DatabaseConfig(_) => "E001",
            StoreError::DatabaseConnection(_) => "E002",
            StoreError::DatabaseOperation(_) => "E003",
            StoreError::FileOperation(_) => "E004",
            StoreError::Validation(_) => "E005",
            StoreError::NotFound(_) => "E006",
            StoreError::Conflict(_) => "E007",
            StoreError::Serialization(_) => "E008",
            StoreError::Pricing(_) => "E009",
            StoreError::Promotion(_) => "E010",
            StoreError::Unauthorized(_) => "E011",
            StoreError::Internal(_) => "E012",
            StoreError::AffiliateInactive(_) => "E013",
            StoreError::InvalidRedirect(_) => "E014",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            StoreError::DatabaseConfig(_) => "Database Configuration Error",
            StoreError::DatabaseConnection(_) => "Database Connection Error",
            StoreError::DatabaseOperation(_) => "Database Operation Error",
            StoreError::FileOperation(_) => "File Operation Error",
            StoreError::Validation(_) => "Validation Error",
            StoreError::NotFound(_) => "Resource Not Found",
            StoreError::Conflict(_) => "Conflict",
            StoreError::Serialization(_) => "Serialization Error",
            StoreError::Pricing(_) => "Pricing Error",
            StoreError::Promotion(_) => "Promotion Rejected",
            StoreError::Unauthorized(_) => "Unauthorized",
            StoreError::Internal(_) => "Internal Error",
            StoreError::AffiliateInactive(_) => "Affiliate Inactive",
            StoreError::InvalidRedirect(_) => "Invalid Redirect",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> String {
        match self {
            StoreError::DatabaseConfig(msg)
            | StoreError::DatabaseConnection(msg)
            | StoreError::DatabaseOperation(msg)
            | StoreError::FileOperation(msg)
            | StoreError::Validation(msg)
            | StoreError::NotFound(msg)
            | StoreError::Conflict(msg)
            | StoreError::Serialization(msg)
            | StoreError::Unauthorized(msg)
            | StoreError::Internal(msg)
            | StoreError::AffiliateInactive(msg)
            | StoreError::InvalidRedirect(msg) => msg.clone(),
            StoreError::Pricing(err) => err.to_string(),
            StoreError::Promotion(reason) => reason.to_string(),
        }
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            StoreError::Validation(_)
            | StoreError::Pricing(_)
            | StoreError::InvalidRedirect(_) => StatusCode::BAD_REQUEST,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Conflict(_) => StatusCode::CONFLICT,
            StoreError::Promotion(_) | StoreError::AffiliateInactive(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            StoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            StoreError::DatabaseConfig(_)
            | StoreError::DatabaseConnection(_)
            | StoreError::DatabaseOperation(_)
            | StoreError::FileOperation(_)
            | StoreError::Serialization(_)
            | StoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

// 便捷的构造函数
impl StoreError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        StoreError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        StoreError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        StoreError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        StoreError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        StoreError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        StoreError::Conflict(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        StoreError::Unauthorized(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        StoreError::Internal(msg.into())
    }

    pub fn affiliate_inactive<T: Into<String>>(msg: T) -> Self {
        StoreError::AffiliateInactive(msg.into())
    }

    pub fn invalid_redirect<T: Into<String>>(msg: T) -> Self {
        StoreError::InvalidRedirect(msg.into())
    }
}

// 唯一约束冲突单独映射为 Conflict
impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) => StoreError::Conflict(msg),
            _ => StoreError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_unique() {
        let errors = [
            StoreError::database_config("a"),
            StoreError::database_connection("a"),
            StoreError::database_operation("a"),
            StoreError::FileOperation("a".into()),
            StoreError::validation("a"),
            StoreError::not_found("a"),
            StoreError::conflict("a"),
            StoreError::Serialization("a".into()),
            StoreError::Pricing(PricingError::NegativePrice(-1)),
            StoreError::Promotion(PromotionRejection::Expired),
            StoreError::unauthorized("a"),
            StoreError::internal("a"),
            StoreError::affiliate_inactive("a"),
            StoreError::invalid_redirect("a"),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            StoreError::validation("bad").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StoreError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            StoreError::conflict("dup").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            StoreError::Promotion(PromotionRejection::Exhausted).http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            StoreError::affiliate_inactive("AFF-1234").http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            StoreError::invalid_redirect("loop").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StoreError::database_operation("boom").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_format_simple() {
        let err = StoreError::validation("name must not be empty");
        assert_eq!(
            err.format_simple(),
            "Validation Error: name must not be empty"
        );
    }

    #[test]
    fn test_pricing_error_converts() {
        let err: StoreError = PricingError::NegativePrice(-5).into();
        assert_eq!(err.code(), "E009");
        assert!(err.message().contains("-5"));
    }
}
