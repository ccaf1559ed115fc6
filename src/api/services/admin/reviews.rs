//! Admin API 评价审核

use actix_web::{Responder, Result as ActixResult, web};
use tracing::info;

use crate::services::ReviewService;
use crate::storage::{ReviewDraft, ReviewFilter, ReviewStatus};

use super::helpers::{
    api_result, created_response, error_from_store, paginated_result, parse_filter,
};
use super::types::{ListQuery, MessageResponse};

pub async fn list_reviews(
    query: web::Query<ListQuery>,
    reviews: web::Data<ReviewService>,
) -> ActixResult<impl Responder> {
    let (page, page_size) = query.paging();
    let result = async {
        let filter = ReviewFilter {
            search: query.search.clone(),
            product_id: query.product_id,
            status: parse_filter::<ReviewStatus>(&query.status, "status")?,
        };
        reviews.list(&filter, page, page_size).await
    }
    .await;
    Ok(paginated_result(result, page, page_size))
}

pub async fn get_review(
    id: web::Path<i32>,
    reviews: web::Data<ReviewService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(reviews.get(id.into_inner()).await))
}

/// 后台录入评价，可直接设为 approved / featured
pub async fn create_review(
    body: web::Json<ReviewDraft>,
    reviews: web::Data<ReviewService>,
) -> ActixResult<impl Responder> {
    Ok(match reviews.save(None, body.into_inner()).await {
        Ok(review) => {
            info!("Admin API: review created {}", review.id);
            created_response(review)
        }
        Err(e) => error_from_store(&e),
    })
}

pub async fn update_review(
    id: web::Path<i32>,
    body: web::Json<ReviewDraft>,
    reviews: web::Data<ReviewService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        reviews.save(Some(id.into_inner()), body.into_inner()).await,
    ))
}

pub async fn delete_review(
    id: web::Path<i32>,
    reviews: web::Data<ReviewService>,
) -> ActixResult<impl Responder> {
    let id = id.into_inner();
    Ok(api_result(reviews.delete(id).await.map(|_| MessageResponse {
        message: format!("Review {} deleted", id),
    })))
}
