//! API 模块常量定义

/// Access Token Cookie 名称
pub const ACCESS_COOKIE_NAME: &str = "storefront_access";

/// Refresh Token Cookie 名称
pub const REFRESH_COOKIE_NAME: &str = "storefront_refresh";

/// JSON-LD 响应类型
pub const JSON_LD_CONTENT_TYPE: &str = "application/ld+json; charset=utf-8";
