//! Admin API 商品管理

use actix_web::{Responder, Result as ActixResult, web};
use tracing::{info, trace};

use crate::services::CatalogService;
use crate::storage::{ProductCategory, ProductDraft, ProductFilter};

use super::helpers::{
    api_result, created_response, error_from_store, paginated_result, parse_filter,
};
use super::types::{ListQuery, MessageResponse};

/// 商品列表（包含下架商品，除非指定 active_only）
pub async fn list_products(
    query: web::Query<ListQuery>,
    catalog: web::Data<CatalogService>,
) -> ActixResult<impl Responder> {
    trace!("Admin API: list products {:?}", query);
    let (page, page_size) = query.paging();

    let result = async {
        let filter = ProductFilter {
            search: query.search.clone(),
            category: parse_filter::<ProductCategory>(&query.category, "category")?,
            active_only: query.active_only.unwrap_or(false),
        };
        catalog.list(&filter, page, page_size).await
    }
    .await;

    Ok(paginated_result(result, page, page_size))
}

pub async fn get_product(
    id: web::Path<i32>,
    catalog: web::Data<CatalogService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(catalog.get(id.into_inner()).await))
}

pub async fn create_product(
    body: web::Json<ProductDraft>,
    catalog: web::Data<CatalogService>,
) -> ActixResult<impl Responder> {
    Ok(match catalog.save(None, body.into_inner()).await {
        Ok(product) => {
            info!("Admin API: product created {} ({})", product.id, product.name);
            created_response(product)
        }
        Err(e) => error_from_store(&e),
    })
}

pub async fn update_product(
    id: web::Path<i32>,
    body: web::Json<ProductDraft>,
    catalog: web::Data<CatalogService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        catalog.save(Some(id.into_inner()), body.into_inner()).await,
    ))
}

pub async fn delete_product(
    id: web::Path<i32>,
    catalog: web::Data<CatalogService>,
) -> ActixResult<impl Responder> {
    let id = id.into_inner();
    Ok(api_result(catalog.delete(id).await.map(|_| MessageResponse {
        message: format!("Product {} deleted", id),
    })))
}

