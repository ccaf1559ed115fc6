//! HTTP API
//!
//! - `/api/...`: public storefront endpoints
//! - `{admin_prefix}/v1/...`: authenticated back-office endpoints
//! - `{health_prefix}`: liveness and readiness checks
//! - anything else: redirect resolution

pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod services;

use actix_web::web;

use crate::config::RoutesConfig;
use middleware::AdminAuth;
use services::{
    admin::{payload_error, routes::admin_v1_routes},
    health_routes, redirect_routes, storefront_routes,
};

/// Mount every route group. The redirect catch-all goes last.
pub fn configure_routes(cfg: &mut web::ServiceConfig, routes: &RoutesConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| payload_error(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| payload_error(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _req| payload_error(err)));

    cfg.service(
        web::scope(&routes.admin_prefix)
            .wrap(AdminAuth)
            .service(admin_v1_routes()),
    )
    .service(web::scope(&routes.health_prefix).service(health_routes()))
    .service(storefront_routes())
    .service(redirect_routes());
}
