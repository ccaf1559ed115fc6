//! Admin API 认证相关端点

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::http::StatusCode;
use actix_web::{
    HttpRequest, HttpResponse, HttpResponseBuilder, Responder, Result as ActixResult, web,
};
use governor::NotUntil;
use governor::clock::{Clock, DefaultClock, QuantaInstant};
use governor::middleware::NoOpMiddleware;
use tracing::{debug, error, info, warn};

use crate::api::constants;
use crate::api::jwt::JwtService;
use crate::config::get_config;
use crate::utils::password::check_admin_password;

use super::error_code::ErrorCode;
use super::helpers::{CookieBuilder, error_response, success_response};
use super::types::{ApiResponse, AuthSuccessResponse, LoginCredentials, MessageResponse};

/// 基于连接 IP 的限流 key 提取器
#[derive(Clone, Copy)]
pub struct LoginKeyExtractor;

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        req.connection_info()
            .peer_addr()
            .map(str::to_string)
            .ok_or_else(|| SimpleKeyExtractionError::new("Unable to extract peer IP"))
    }

    /// 超限时同样返回统一的 JSON 信封，状态码保持 429
    fn exceed_rate_limit_response(
        &self,
        negative: &NotUntil<QuantaInstant>,
        mut response: HttpResponseBuilder,
    ) -> HttpResponse {
        let wait_secs = negative
            .wait_time_from(DefaultClock::default().now())
            .as_secs()
            .max(1);
        warn!("Admin API: login rate limit hit, retry after {}s", wait_secs);
        response
            .append_header(("Retry-After", wait_secs.to_string()))
            .json(ApiResponse::<()> {
                code: ErrorCode::RateLimitExceeded as i32,
                message: format!("Too many login attempts, retry after {}s", wait_secs),
                data: None,
            })
    }
}

/// 创建登录限流器
///
/// 每秒补充 1 个令牌，突发最多 5 次请求，超限返回 429
pub fn login_rate_limiter() -> Governor<LoginKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!("Login rate limiter created: 1 req/s, burst 5");
    Governor::new(&config)
}

/// 签发一对新 token 并写入 cookie
fn issue_tokens(message: &str) -> HttpResponse {
    let jwt_service = JwtService::from_config();
    let tokens = jwt_service
        .generate_access_token()
        .and_then(|access| Ok((access, jwt_service.generate_refresh_token()?)));
    let (access_token, refresh_token) = match tokens {
        Ok(pair) => pair,
        Err(e) => {
            error!("Admin API: failed to generate token: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Failed to generate token",
            );
        }
    };

    let cookie_builder = CookieBuilder::from_config();
    HttpResponse::Ok()
        .cookie(cookie_builder.build_access_cookie(access_token.clone()))
        .cookie(cookie_builder.build_refresh_cookie(refresh_token))
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: ErrorCode::Success as i32,
            message: message.to_string(),
            data: Some(AuthSuccessResponse {
                message: message.to_string(),
                access_token,
                expires_in: cookie_builder.access_token_minutes() * 60,
            }),
        })
}

/// 登录 - 校验管理员密码
pub async fn login(login_body: web::Json<LoginCredentials>) -> ActixResult<impl Responder> {
    let config = get_config();

    let password_valid =
        match check_admin_password(&login_body.password, &config.api.admin_password) {
            Ok(valid) => valid,
            Err(e) => {
                error!("Admin API: password verification error: {}", e);
                return Ok(error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalServerError,
                    "Authentication error",
                ));
            }
        };

    if !password_valid {
        warn!("Admin API: login failed - invalid password");
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::AuthFailed,
            "Invalid admin password",
        ));
    }

    info!("Admin API: login successful");
    Ok(issue_tokens("Login successful"))
}

/// 刷新 token（滑动过期）
pub async fn refresh_token(req: HttpRequest) -> ActixResult<impl Responder> {
    let Some(refresh_token) = req
        .cookie(constants::REFRESH_COOKIE_NAME)
        .map(|c| c.value().to_string())
    else {
        warn!("Admin API: refresh token not found in cookie");
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::TokenInvalid,
            "Refresh token not found",
        ));
    };

    let jwt_service = JwtService::from_config();
    if let Err(e) = jwt_service.validate_refresh_token(&refresh_token) {
        warn!("Admin API: invalid refresh token: {}", e);
        let code = match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => ErrorCode::TokenExpired,
            _ => ErrorCode::TokenInvalid,
        };
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            code,
            "Invalid refresh token",
        ));
    }

    info!("Admin API: token refresh successful");
    Ok(issue_tokens("Token refreshed"))
}

/// 登出 - 清除 cookies
pub async fn logout() -> ActixResult<impl Responder> {
    info!("Admin API: logout");

    let cookie_builder = CookieBuilder::from_config();
    Ok(HttpResponse::Ok()
        .cookie(cookie_builder.build_expired_access_cookie())
        .cookie(cookie_builder.build_expired_refresh_cookie())
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: ErrorCode::Success as i32,
            message: "Logout successful".to_string(),
            data: Some(MessageResponse {
                message: "Logout successful".to_string(),
            }),
        }))
}

/// 验证 token - 如果中间件通过，则 token 有效
pub async fn verify_token() -> ActixResult<impl Responder> {
    Ok(success_response(MessageResponse {
        message: "Token is valid".to_string(),
    }))
}
