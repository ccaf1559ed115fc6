//! Admin API 跳转规则管理

use actix_web::{Responder, Result as ActixResult, web};
use tracing::info;

use crate::services::RedirectService;
use crate::storage::RedirectDraft;

use super::helpers::{api_result, created_response, error_from_store, paginated_result};
use super::types::{ListQuery, MessageResponse};

pub async fn list_redirects(
    query: web::Query<ListQuery>,
    redirects: web::Data<RedirectService>,
) -> ActixResult<impl Responder> {
    let (page, page_size) = query.paging();
    Ok(paginated_result(
        redirects.list(&query.search, page, page_size).await,
        page,
        page_size,
    ))
}

pub async fn get_redirect(
    id: web::Path<i32>,
    redirects: web::Data<RedirectService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(redirects.get(id.into_inner()).await))
}

pub async fn create_redirect(
    body: web::Json<RedirectDraft>,
    redirects: web::Data<RedirectService>,
) -> ActixResult<impl Responder> {
    Ok(match redirects.save(None, body.into_inner()).await {
        Ok(redirect) => {
            info!(
                "Admin API: redirect created {} -> {}",
                redirect.from_path, redirect.to_path
            );
            created_response(redirect)
        }
        Err(e) => error_from_store(&e),
    })
}

pub async fn update_redirect(
    id: web::Path<i32>,
    body: web::Json<RedirectDraft>,
    redirects: web::Data<RedirectService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        redirects
            .save(Some(id.into_inner()), body.into_inner())
            .await,
    ))
}

pub async fn delete_redirect(
    id: web::Path<i32>,
    redirects: web::Data<RedirectService>,
) -> ActixResult<impl Responder> {
    let id = id.into_inner();
    Ok(api_result(redirects.delete(id).await.map(|_| MessageResponse {
        message: format!("Redirect {} deleted", id),
    })))
}
