//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use serde::Serialize;
use tracing::error;

use crate::api::constants;
use crate::errors::StoreError;
use crate::storage::Paged;
use crate::storage::backend::normalize_page;

use super::error_code::ErrorCode;
use super::types::{ApiResponse, ListQuery, PaginatedData};

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 201 Created
pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 StoreError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_store(err: &StoreError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("{}", err.format_simple());
    }
    error_response(status, ErrorCode::from(err), &err.message())
}

/// Like [`error_from_store`], but a `NotFound` carries `code` instead of the generic one
pub fn error_with_not_found(err: &StoreError, code: ErrorCode) -> HttpResponse {
    match err {
        StoreError::NotFound(msg) => error_response(StatusCode::NOT_FOUND, code, msg),
        other => error_from_store(other),
    }
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 StoreError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<StoreError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: StoreError = e.into();
            error_from_store(&err)
        }
    }
}

/// 分页结果 → `{ items, pagination }`
pub fn paginated_result<T: Serialize>(
    result: Result<Paged<T>, StoreError>,
    page: u64,
    page_size: u64,
) -> HttpResponse {
    api_result(result.map(|paged| PaginatedData::from_paged(paged, page, page_size)))
}

impl ListQuery {
    /// 规范化后的 (page, page_size)
    pub fn paging(&self) -> (u64, u64) {
        normalize_page(self.page, self.page_size)
    }
}

/// 解析可选的枚举过滤参数，非法值返回 Validation
pub fn parse_filter<T: std::str::FromStr>(
    value: &Option<String>,
    field: &str,
) -> Result<Option<T>, StoreError> {
    match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| StoreError::validation(format!("Invalid {}: {}", field, raw))),
    }
}

/// 请求体 / 查询参数解析失败时返回统一的 JSON 错误
pub fn payload_error(err: impl std::fmt::Display) -> actix_web::Error {
    let message = err.to_string();
    actix_web::error::InternalError::from_response(
        message.clone(),
        error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message),
    )
    .into()
}

/// Cookie 构建器
pub struct CookieBuilder {
    secure: bool,
    access_token_minutes: u64,
    refresh_token_days: u64,
    admin_prefix: String,
}

impl CookieBuilder {
    pub fn from_config() -> Self {
        let config = crate::config::get_config();
        Self {
            secure: config.api.cookie_secure,
            access_token_minutes: config.api.access_token_minutes,
            refresh_token_days: config.api.refresh_token_days,
            admin_prefix: config.routes.admin_prefix.clone(),
        }
    }

    fn build_cookie_base(
        &self,
        name: &str,
        value: String,
        path: String,
        max_age: actix_web::cookie::time::Duration,
    ) -> Cookie<'static> {
        let mut cookie = Cookie::new(name.to_string(), value);
        cookie.set_path(path);
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_max_age(max_age);
        cookie
    }

    /// Refresh cookie 只发往认证端点
    fn refresh_path(&self) -> String {
        format!("{}/v1/auth", self.admin_prefix)
    }

    pub fn build_access_cookie(&self, token: String) -> Cookie<'static> {
        self.build_cookie_base(
            constants::ACCESS_COOKIE_NAME,
            token,
            "/".to_string(),
            actix_web::cookie::time::Duration::minutes(self.access_token_minutes as i64),
        )
    }

    pub fn build_refresh_cookie(&self, token: String) -> Cookie<'static> {
        self.build_cookie_base(
            constants::REFRESH_COOKIE_NAME,
            token,
            self.refresh_path(),
            actix_web::cookie::time::Duration::days(self.refresh_token_days as i64),
        )
    }

    pub fn build_expired_access_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(
            constants::ACCESS_COOKIE_NAME,
            String::new(),
            "/".to_string(),
            actix_web::cookie::time::Duration::ZERO,
        )
    }

    pub fn build_expired_refresh_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(
            constants::REFRESH_COOKIE_NAME,
            String::new(),
            self.refresh_path(),
            actix_web::cookie::time::Duration::ZERO,
        )
    }

    pub fn access_token_minutes(&self) -> u64 {
        self.access_token_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_rt::test]
    async fn test_success_envelope() {
        let resp = success_response(serde_json::json!({"id": 7}));
        assert_eq!(resp.status(), StatusCode::OK);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["data"]["id"], 7);
    }

    #[actix_rt::test]
    async fn test_error_from_store_maps_status() {
        let resp = error_from_store(&StoreError::conflict("code taken"));
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], ErrorCode::Conflict as i32);
        assert_eq!(json["message"], "code taken");
    }

    #[test]
    fn test_not_found_override() {
        let resp = error_with_not_found(&StoreError::not_found("gone"), ErrorCode::PostNotFound);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = error_with_not_found(&StoreError::validation("bad"), ErrorCode::PostNotFound);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_filter() {
        use crate::storage::ProductCategory;

        let none: Option<ProductCategory> = parse_filter(&None, "category").unwrap();
        assert!(none.is_none());
        let blank: Option<ProductCategory> = parse_filter(&Some("  ".into()), "category").unwrap();
        assert!(blank.is_none());
        let iptv: Option<ProductCategory> =
            parse_filter(&Some("IPTV".into()), "category").unwrap();
        assert_eq!(iptv, Some(ProductCategory::Iptv));
        let bad = parse_filter::<ProductCategory>(&Some("toaster".into()), "category");
        assert!(matches!(bad, Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_cookie_paths() {
        let builder = CookieBuilder {
            secure: true,
            access_token_minutes: 15,
            refresh_token_days: 7,
            admin_prefix: "/admin".into(),
        };
        let access = builder.build_access_cookie("a".into());
        assert_eq!(access.path(), Some("/"));
        assert!(access.http_only().unwrap_or(false));
        assert_eq!(access.secure(), Some(true));

        let refresh = builder.build_refresh_cookie("r".into());
        assert_eq!(refresh.path(), Some("/admin/v1/auth"));

        let expired = builder.build_expired_refresh_cookie();
        assert_eq!(expired.value(), "");
        assert_eq!(
            expired.max_age(),
            Some(actix_web::cookie::time::Duration::ZERO)
        );
    }
}
