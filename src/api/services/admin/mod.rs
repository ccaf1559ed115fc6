//! Admin API 服务模块
//!
//! - 认证（登录、登出、token 刷新）
//! - 商品、优惠码、跳转、博客、推广员、评价的 CRUD
//! - 仪表盘统计

mod affiliates;
pub mod auth;
pub mod error_code;
mod helpers;
mod posts;
mod products;
mod promotions;
mod redirects;
mod reviews;
pub mod routes;
mod stats;
mod types;

// 重新导出类型
pub use types::*;

// 重新导出帮助函数
pub use helpers::{
    CookieBuilder, api_result, created_response, error_from_store, error_response,
    error_with_not_found, json_response, paginated_result, parse_filter, payload_error,
    success_response,
};

pub use error_code::ErrorCode;

pub use promotions::PromotionResponse;
