//! Admin API 博客管理

use actix_web::{Responder, Result as ActixResult, web};
use tracing::info;

use crate::services::BlogService;
use crate::storage::{PostDraft, PostFilter, PostStatus};

use super::helpers::{
    api_result, created_response, error_from_store, paginated_result, parse_filter,
};
use super::types::{ListQuery, MessageResponse};

/// 文章列表（草稿与已发布）
pub async fn list_posts(
    query: web::Query<ListQuery>,
    blog: web::Data<BlogService>,
) -> ActixResult<impl Responder> {
    let (page, page_size) = query.paging();
    let result = async {
        let filter = PostFilter {
            search: query.search.clone(),
            status: parse_filter::<PostStatus>(&query.status, "status")?,
        };
        blog.list(&filter, page, page_size).await
    }
    .await;
    Ok(paginated_result(result, page, page_size))
}

pub async fn get_post(
    id: web::Path<i32>,
    blog: web::Data<BlogService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(blog.get(id.into_inner()).await))
}

pub async fn create_post(
    body: web::Json<PostDraft>,
    blog: web::Data<BlogService>,
) -> ActixResult<impl Responder> {
    Ok(match blog.save(None, body.into_inner()).await {
        Ok(post) => {
            info!("Admin API: post created {} ({})", post.id, post.slug);
            created_response(post)
        }
        Err(e) => error_from_store(&e),
    })
}

pub async fn update_post(
    id: web::Path<i32>,
    body: web::Json<PostDraft>,
    blog: web::Data<BlogService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        blog.save(Some(id.into_inner()), body.into_inner()).await,
    ))
}

pub async fn delete_post(
    id: web::Path<i32>,
    blog: web::Data<BlogService>,
) -> ActixResult<impl Responder> {
    let id = id.into_inner();
    Ok(api_result(blog.delete(id).await.map(|_| MessageResponse {
        message: format!("Post {} deleted", id),
    })))
}
