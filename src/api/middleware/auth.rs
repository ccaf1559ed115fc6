use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, header::CONTENT_TYPE},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info, trace};

use crate::api::constants;
use crate::api::jwt::JwtService;
use crate::api::services::admin::{ApiResponse, ErrorCode};
use crate::config::get_config;

/// Endpoints under `{admin_prefix}/v1/auth/` reachable without an access token
const PUBLIC_AUTH_ENDPOINTS: [&str; 3] = ["login", "refresh", "logout"];

/// Admin authentication middleware
///
/// Accepts either `Authorization: Bearer <access token>` or the access
/// token cookie. The whole admin scope answers 404 while no admin password
/// is configured.
#[derive(Clone)]
pub struct AdminAuth;

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
            admin_prefix: get_config().routes.admin_prefix.clone(),
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
    admin_prefix: String,
}

impl<S, B> AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle OPTIONS requests for CORS preflight
    fn handle_options_request(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::NoContent()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .finish()
                .map_into_right_body(),
        )
    }

    /// Handle requests when no admin password is configured
    fn handle_disabled(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        debug!("Admin password not configured - returning 404");
        req.into_response(
            HttpResponse::NotFound()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .body("Not Found")
                .map_into_right_body(),
        )
    }

    fn handle_unauthorized(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        info!("Admin authentication failed - invalid or missing token");
        req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::Unauthorized as i32,
                    message: "Unauthorized: Invalid or missing token".to_string(),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
    }

    fn validate_access_token(jwt_service: &JwtService, token: &str, source: &str) -> bool {
        match jwt_service.validate_access_token(token) {
            Ok(_claims) => {
                trace!("{} token validation successful", source);
                true
            }
            Err(e) => {
                info!("{} token validation failed: {}", source, e);
                false
            }
        }
    }

    fn is_public_auth_endpoint(req: &ServiceRequest, admin_prefix: &str) -> bool {
        req.path()
            .strip_prefix(admin_prefix)
            .and_then(|rest| rest.strip_prefix("/v1/auth/"))
            .is_some_and(|endpoint| PUBLIC_AUTH_ENDPOINTS.contains(&endpoint))
    }
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let admin_prefix = self.admin_prefix.clone();

        Box::pin(async move {
            // 每次请求都读取最新配置
            let config = get_config();
            if !config.api.admin_enabled() {
                return Ok(Self::handle_disabled(req));
            }

            if req.method() == Method::OPTIONS {
                return Ok(Self::handle_options_request(req));
            }

            // login / refresh / logout 自行处理凭据
            if Self::is_public_auth_endpoint(&req, &admin_prefix) {
                trace!("Public auth endpoint accessed - bypassing authentication");
                let response = srv.call(req).await?.map_into_left_body();
                return Ok(response);
            }

            let jwt_service = JwtService::from_config();

            // 1. Bearer Token
            if let Some(token) = Self::extract_bearer_token(&req)
                && Self::validate_access_token(&jwt_service, &token, "Bearer")
            {
                let response = srv.call(req).await?.map_into_left_body();
                return Ok(response);
            }

            // 2. Cookie
            let cookie_token = req
                .cookie(constants::ACCESS_COOKIE_NAME)
                .map(|c| c.value().to_string());
            if let Some(token) = cookie_token
                && Self::validate_access_token(&jwt_service, &token, "Cookie")
            {
                let response = srv.call(req).await?.map_into_left_body();
                return Ok(response);
            }

            Ok(Self::handle_unauthorized(req))
        })
    }
}
