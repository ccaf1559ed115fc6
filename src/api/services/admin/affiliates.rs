//! Admin API 推广员管理

use actix_web::{Responder, Result as ActixResult, web};
use tracing::info;

use crate::services::AffiliateService;
use crate::storage::AffiliateDraft;

use super::helpers::{api_result, created_response, error_from_store, paginated_result};
use super::types::{ListQuery, MessageResponse, SaleRequest};

pub async fn list_affiliates(
    query: web::Query<ListQuery>,
    affiliates: web::Data<AffiliateService>,
) -> ActixResult<impl Responder> {
    let (page, page_size) = query.paging();
    Ok(paginated_result(
        affiliates.list(&query.search, page, page_size).await,
        page,
        page_size,
    ))
}

pub async fn get_affiliate(
    id: web::Path<i32>,
    affiliates: web::Data<AffiliateService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(affiliates.get(id.into_inner()).await))
}

pub async fn create_affiliate(
    body: web::Json<AffiliateDraft>,
    affiliates: web::Data<AffiliateService>,
) -> ActixResult<impl Responder> {
    Ok(match affiliates.save(None, body.into_inner()).await {
        Ok(affiliate) => {
            info!(
                "Admin API: affiliate created {} ({})",
                affiliate.name, affiliate.code
            );
            created_response(affiliate)
        }
        Err(e) => error_from_store(&e),
    })
}

pub async fn update_affiliate(
    id: web::Path<i32>,
    body: web::Json<AffiliateDraft>,
    affiliates: web::Data<AffiliateService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        affiliates
            .save(Some(id.into_inner()), body.into_inner())
            .await,
    ))
}

pub async fn delete_affiliate(
    id: web::Path<i32>,
    affiliates: web::Data<AffiliateService>,
) -> ActixResult<impl Responder> {
    let id = id.into_inner();
    Ok(api_result(affiliates.delete(id).await.map(|_| MessageResponse {
        message: format!("Affiliate {} deleted", id),
    })))
}

/// 记录一笔推广成交并累计佣金
pub async fn record_sale(
    id: web::Path<i32>,
    body: web::Json<SaleRequest>,
    affiliates: web::Data<AffiliateService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        affiliates
            .record_sale(id.into_inner(), body.amount_cents)
            .await,
    ))
}
