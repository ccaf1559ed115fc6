//! Admin API 类型定义

use serde::{Deserialize, Serialize};

use crate::storage::Paged;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginCredentials {
    pub password: String,
}

/// 统一响应包装：`{ code, message, data }`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AuthSuccessResponse {
    pub message: String,
    /// Same token as the access cookie, for `Authorization: Bearer` clients
    pub access_token: String,
    pub expires_in: u64,
}

/// 列表查询参数，各实体只读取自己关心的字段
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub product_id: Option<i32>,
    pub active_only: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PaginationInfo {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationInfo {
    pub fn new(page: u64, page_size: u64, total: u64) -> Self {
        Self {
            page,
            page_size,
            total,
            total_pages: total.div_ceil(page_size.max(1)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PaginatedData<T> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

impl<T> PaginatedData<T> {
    pub fn from_paged(paged: Paged<T>, page: u64, page_size: u64) -> Self {
        Self {
            pagination: PaginationInfo::new(page, page_size, paged.total),
            items: paged.items,
        }
    }
}

/// 推广员成交记录
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SaleRequest {
    pub amount_cents: i64,
}
