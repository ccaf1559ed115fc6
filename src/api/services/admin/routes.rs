//! Admin API 路由配置
//!
//! /v1 下的路由按实体拆分。

use actix_web::web;

use super::affiliates::{
    create_affiliate, delete_affiliate, get_affiliate, list_affiliates, record_sale,
    update_affiliate,
};
use super::auth::{login, login_rate_limiter, logout, refresh_token, verify_token};
use super::posts::{create_post, delete_post, get_post, list_posts, update_post};
use super::products::{
    create_product, delete_product, get_product, list_products, update_product,
};
use super::promotions::{
    create_promotion, delete_promotion, get_promotion, list_promotions, redeem_promotion,
    update_promotion,
};
use super::redirects::{
    create_redirect, delete_redirect, get_redirect, list_redirects, update_redirect,
};
use super::reviews::{create_review, delete_review, get_review, list_reviews, update_review};
use super::stats::get_stats;

/// 认证路由 `/auth`
///
/// - POST /auth/login - 登录（带限流）
/// - POST /auth/refresh - 刷新 token
/// - POST /auth/logout - 登出
/// - GET /auth/verify - 验证 token
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route("/login", web::post().to(login).wrap(login_rate_limiter()))
        .route("/refresh", web::post().to(refresh_token))
        .route("/logout", web::post().to(logout))
        .route("/verify", web::get().to(verify_token))
}

pub fn products_routes() -> actix_web::Scope {
    web::scope("/products")
        .route("", web::get().to(list_products))
        .route("", web::post().to(create_product))
        .route("/{id}", web::get().to(get_product))
        .route("/{id}", web::put().to(update_product))
        .route("/{id}", web::delete().to(delete_product))
}

/// `/promotions`，另含 POST /promotions/{id}/redeem
pub fn promotions_routes() -> actix_web::Scope {
    web::scope("/promotions")
        .route("", web::get().to(list_promotions))
        .route("", web::post().to(create_promotion))
        .route("/{id}/redeem", web::post().to(redeem_promotion))
        .route("/{id}", web::get().to(get_promotion))
        .route("/{id}", web::put().to(update_promotion))
        .route("/{id}", web::delete().to(delete_promotion))
}

pub fn redirects_routes() -> actix_web::Scope {
    web::scope("/redirects")
        .route("", web::get().to(list_redirects))
        .route("", web::post().to(create_redirect))
        .route("/{id}", web::get().to(get_redirect))
        .route("/{id}", web::put().to(update_redirect))
        .route("/{id}", web::delete().to(delete_redirect))
}

pub fn posts_routes() -> actix_web::Scope {
    web::scope("/posts")
        .route("", web::get().to(list_posts))
        .route("", web::post().to(create_post))
        .route("/{id}", web::get().to(get_post))
        .route("/{id}", web::put().to(update_post))
        .route("/{id}", web::delete().to(delete_post))
}

/// `/affiliates`，另含 POST /affiliates/{id}/sales
pub fn affiliates_routes() -> actix_web::Scope {
    web::scope("/affiliates")
        .route("", web::get().to(list_affiliates))
        .route("", web::post().to(create_affiliate))
        .route("/{id}/sales", web::post().to(record_sale))
        .route("/{id}", web::get().to(get_affiliate))
        .route("/{id}", web::put().to(update_affiliate))
        .route("/{id}", web::delete().to(delete_affiliate))
}

pub fn reviews_routes() -> actix_web::Scope {
    web::scope("/reviews")
        .route("", web::get().to(list_reviews))
        .route("", web::post().to(create_review))
        .route("/{id}", web::get().to(get_review))
        .route("/{id}", web::put().to(update_review))
        .route("/{id}", web::delete().to(delete_review))
}

/// Admin API v1 路由
pub fn admin_v1_routes() -> actix_web::Scope {
    web::scope("/v1")
        .service(auth_routes())
        .service(products_routes())
        .service(promotions_routes())
        .service(redirects_routes())
        .service(posts_routes())
        .service(affiliates_routes())
        .service(reviews_routes())
        .route("/stats", web::get().to(get_stats))
}
