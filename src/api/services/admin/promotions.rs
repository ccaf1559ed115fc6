//! Admin API 优惠码管理

use actix_web::{Responder, Result as ActixResult, web};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::pricing::PromotionStatus;
use crate::services::PromotionService;
use crate::storage::{Paged, Promotion, PromotionDraft};

use super::helpers::{api_result, created_response, error_from_store, paginated_result};
use super::types::{ListQuery, MessageResponse};

/// 管理端展示用：附带当前状态
#[derive(Debug, Serialize)]
pub struct PromotionResponse {
    #[serde(flatten)]
    pub promotion: Promotion,
    pub status: PromotionStatus,
}

impl From<Promotion> for PromotionResponse {
    fn from(promotion: Promotion) -> Self {
        let status = promotion.status_at(Utc::now());
        Self { promotion, status }
    }
}

pub async fn list_promotions(
    query: web::Query<ListQuery>,
    promotions: web::Data<PromotionService>,
) -> ActixResult<impl Responder> {
    let (page, page_size) = query.paging();
    let result = promotions
        .list(&query.search, page, page_size)
        .await
        .map(|paged| Paged {
            items: paged
                .items
                .into_iter()
                .map(PromotionResponse::from)
                .collect(),
            total: paged.total,
        });
    Ok(paginated_result(result, page, page_size))
}

pub async fn get_promotion(
    id: web::Path<i32>,
    promotions: web::Data<PromotionService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        promotions
            .get(id.into_inner())
            .await
            .map(PromotionResponse::from),
    ))
}

pub async fn create_promotion(
    body: web::Json<PromotionDraft>,
    promotions: web::Data<PromotionService>,
) -> ActixResult<impl Responder> {
    Ok(match promotions.save(None, body.into_inner()).await {
        Ok(promotion) => {
            info!("Admin API: promotion created {}", promotion.code);
            created_response(PromotionResponse::from(promotion))
        }
        Err(e) => error_from_store(&e),
    })
}

pub async fn update_promotion(
    id: web::Path<i32>,
    body: web::Json<PromotionDraft>,
    promotions: web::Data<PromotionService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        promotions
            .save(Some(id.into_inner()), body.into_inner())
            .await
            .map(PromotionResponse::from),
    ))
}

pub async fn delete_promotion(
    id: web::Path<i32>,
    promotions: web::Data<PromotionService>,
) -> ActixResult<impl Responder> {
    let id = id.into_inner();
    Ok(api_result(promotions.delete(id).await.map(|_| MessageResponse {
        message: format!("Promotion {} deleted", id),
    })))
}

/// 记录一次使用（下单成功后由后台调用）
pub async fn redeem_promotion(
    id: web::Path<i32>,
    promotions: web::Data<PromotionService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        promotions
            .redeem(id.into_inner())
            .await
            .map(PromotionResponse::from),
    ))
}
