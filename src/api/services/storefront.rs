//! Public storefront API under `/api`
//!
//! Read-only catalog and content, price quotes, coupon checks and review
//! submission. Nothing here requires authentication.

use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, trace};

use crate::api::constants::JSON_LD_CONTENT_TYPE;
use crate::api::services::admin::{
    ErrorCode, ListQuery, api_result, created_response, error_from_store, error_response,
    error_with_not_found, paginated_result, parse_filter, success_response,
};
use crate::config::get_config;
use crate::errors::StoreError;
use crate::pricing::{IptvPlan, iptv_price_matrix, quote_iptv, quote_quantity};
use crate::services::catalog::with_default_image;
use crate::services::{
    BlogService, CartLineRequest, CatalogService, PromotionService, ReviewService, seo,
};
use crate::storage::{Paged, ProductCategory, ProductFilter, ReviewDraft};

/// Upper bound for documents that embed a whole listing
const SEO_LISTING_LIMIT: u64 = 100;

#[derive(Debug, Deserialize)]
pub struct QuantityQuoteRequest {
    /// Price taken from the catalog when present
    pub product_id: Option<i32>,
    pub base_unit_cents: Option<i64>,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct IptvQuoteRequest {
    pub plan: String,
    pub devices: u32,
}

#[derive(Debug, Deserialize)]
pub struct CartQuoteRequest {
    pub lines: Vec<CartLineRequest>,
    #[serde(default)]
    pub coupon_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CouponCheckRequest {
    pub code: String,
    pub subtotal_cents: i64,
}

fn json_ld(doc: Value) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, JSON_LD_CONTENT_TYPE))
        .json(doc)
}

// ============================================================
// Catalog
// ============================================================

pub async fn list_products(
    query: web::Query<ListQuery>,
    catalog: web::Data<CatalogService>,
) -> ActixResult<impl Responder> {
    let (page, page_size) = query.paging();
    let default_image = get_config().store.default_image_url.clone();

    let result = async {
        let filter = ProductFilter {
            search: query.search.clone(),
            category: parse_filter::<ProductCategory>(&query.category, "category")?,
            active_only: true,
        };
        let paged = catalog.list(&filter, page, page_size).await?;
        Ok::<_, StoreError>(Paged {
            items: paged
                .items
                .into_iter()
                .map(|p| with_default_image(p, &default_image))
                .collect(),
            total: paged.total,
        })
    }
    .await;

    Ok(paginated_result(result, page, page_size))
}

pub async fn get_product(
    id: web::Path<i32>,
    catalog: web::Data<CatalogService>,
) -> ActixResult<impl Responder> {
    let config = get_config();
    Ok(match catalog.get_active(id.into_inner()).await {
        Ok(product) => success_response(with_default_image(
            product,
            &config.store.default_image_url,
        )),
        Err(e) => error_with_not_found(&e, ErrorCode::ProductNotFound),
    })
}

// ============================================================
// Pricing
// ============================================================

pub async fn get_iptv_matrix() -> ActixResult<impl Responder> {
    Ok(success_response(iptv_price_matrix()))
}

pub async fn quote_iptv_plan(body: web::Json<IptvQuoteRequest>) -> ActixResult<impl Responder> {
    let result = body
        .plan
        .parse::<IptvPlan>()
        .and_then(|plan| quote_iptv(plan, body.devices));
    Ok(api_result(result))
}

pub async fn quote_quantity_price(
    body: web::Json<QuantityQuoteRequest>,
    catalog: web::Data<CatalogService>,
) -> ActixResult<impl Responder> {
    let base_unit_cents = match (body.product_id, body.base_unit_cents) {
        (Some(id), _) => match catalog.get_active(id).await {
            Ok(product) => product.price_cents,
            Err(e) => return Ok(error_with_not_found(&e, ErrorCode::ProductNotFound)),
        },
        (None, Some(cents)) => cents,
        (None, None) => {
            return Ok(error_from_store(&StoreError::validation(
                "Either product_id or base_unit_cents is required",
            )));
        }
    };

    Ok(api_result(quote_quantity(base_unit_cents, body.quantity)))
}

/// Price a cart, optionally with a coupon. No coupon use is consumed.
pub async fn quote_cart(
    body: web::Json<CartQuoteRequest>,
    catalog: web::Data<CatalogService>,
    promotions: web::Data<PromotionService>,
) -> ActixResult<impl Responder> {
    trace!("Storefront API: cart quote for {} lines", body.lines.len());
    let result = async {
        let quote = catalog.quote_lines(&body.lines).await?;
        promotions
            .apply_to_quote(quote, body.coupon_code.as_deref())
            .await
    }
    .await;
    Ok(api_result(result))
}

pub async fn validate_coupon(
    body: web::Json<CouponCheckRequest>,
    promotions: web::Data<PromotionService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        promotions.check(&body.code, body.subtotal_cents).await,
    ))
}

// ============================================================
// Blog
// ============================================================

pub async fn list_blog(
    query: web::Query<ListQuery>,
    blog: web::Data<BlogService>,
) -> ActixResult<impl Responder> {
    let (page, page_size) = query.paging();
    Ok(paginated_result(
        blog.list_published(query.search.clone(), page, page_size)
            .await,
        page,
        page_size,
    ))
}

pub async fn read_post(
    slug: web::Path<String>,
    blog: web::Data<BlogService>,
) -> ActixResult<impl Responder> {
    Ok(match blog.read_published(&slug).await {
        Ok(view) => success_response(view),
        Err(e) => error_with_not_found(&e, ErrorCode::PostNotFound),
    })
}

// ============================================================
// Reviews
// ============================================================

pub async fn list_reviews(
    query: web::Query<ListQuery>,
    reviews: web::Data<ReviewService>,
) -> ActixResult<impl Responder> {
    let (page, page_size) = query.paging();
    Ok(paginated_result(
        reviews
            .list_approved(query.product_id, page, page_size)
            .await,
        page,
        page_size,
    ))
}

pub async fn submit_review(
    body: web::Json<ReviewDraft>,
    reviews: web::Data<ReviewService>,
) -> ActixResult<impl Responder> {
    Ok(match reviews.submit(body.into_inner()).await {
        Ok(review) => {
            info!("Storefront API: review {} awaiting moderation", review.id);
            created_response(review)
        }
        Err(StoreError::Validation(msg)) => {
            error_response(StatusCode::BAD_REQUEST, ErrorCode::ReviewRejected, &msg)
        }
        Err(e) => error_from_store(&e),
    })
}

// ============================================================
// Structured data
// ============================================================

pub async fn seo_organization() -> ActixResult<impl Responder> {
    Ok(json_ld(seo::organization(&get_config().store)))
}

pub async fn seo_products(catalog: web::Data<CatalogService>) -> ActixResult<impl Responder> {
    let config = get_config();
    let filter = ProductFilter {
        active_only: true,
        ..Default::default()
    };
    Ok(match catalog.list(&filter, 1, SEO_LISTING_LIMIT).await {
        Ok(paged) => {
            let products: Vec<_> = paged
                .items
                .into_iter()
                .map(|p| with_default_image(p, &config.store.default_image_url))
                .collect();
            json_ld(seo::product_list(&products, &config.store))
        }
        Err(e) => error_from_store(&e),
    })
}

pub async fn seo_blog(blog: web::Data<BlogService>) -> ActixResult<impl Responder> {
    let config = get_config();
    Ok(match blog.list_published(None, 1, SEO_LISTING_LIMIT).await {
        Ok(paged) => {
            let posts: Vec<_> = paged.items.into_iter().map(|view| view.post).collect();
            json_ld(seo::blog(&posts, &config.store))
        }
        Err(e) => error_from_store(&e),
    })
}

pub async fn seo_blog_post(
    slug: web::Path<String>,
    blog: web::Data<BlogService>,
) -> ActixResult<impl Responder> {
    Ok(match blog.find_published(&slug).await {
        Ok(post) => json_ld(seo::blog_posting(&post, &get_config().store)),
        Err(e) => error_with_not_found(&e, ErrorCode::PostNotFound),
    })
}

/// Storefront 路由 `/api`
pub fn storefront_routes() -> actix_web::Scope {
    web::scope("/api")
        .route("/products", web::get().to(list_products))
        .route("/products/{id}", web::get().to(get_product))
        .route("/pricing/iptv", web::get().to(get_iptv_matrix))
        .route("/pricing/iptv", web::post().to(quote_iptv_plan))
        .route("/pricing/quantity", web::post().to(quote_quantity_price))
        .route("/cart/quote", web::post().to(quote_cart))
        .route("/promotions/validate", web::post().to(validate_coupon))
        .route("/blog", web::get().to(list_blog))
        .route("/blog/{slug}", web::get().to(read_post))
        .route("/reviews", web::get().to(list_reviews))
        .route("/reviews", web::post().to(submit_review))
        .route("/seo/organization", web::get().to(seo_organization))
        .route("/seo/products", web::get().to(seo_products))
        .route("/seo/blog", web::get().to(seo_blog))
        .route("/seo/blog/{slug}", web::get().to(seo_blog_post))
}
