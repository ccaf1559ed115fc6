//! Blog post table operations

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DbErr, EntityTrait, ExprTrait,
    PaginatorTrait, QueryFilter, QueryOrder, sea_query::Expr,
};
use tracing::info;

use super::converters::{model_to_post, post_draft_to_active_model};
use super::{SeaOrmStorage, contains_ignore_case, retry, search_term};
use crate::errors::{Result, StoreError};
use crate::storage::models::{BlogPost, Paged, PostDraft, PostFilter, PostStatus};

use migration::entities::blog_post;

impl SeaOrmStorage {
    /// Newest first: `published_at`, then `created_at`
    pub async fn list_posts(
        &self,
        filter: &PostFilter,
        page: u64,
        page_size: u64,
    ) -> Result<Paged<BlogPost>> {
        let mut condition = Condition::all();
        if let Some(search) = search_term(&filter.search) {
            condition = condition.add(
                Condition::any()
                    .add(contains_ignore_case(blog_post::Column::Title, &search))
                    .add(contains_ignore_case(blog_post::Column::Excerpt, &search))
                    .add(contains_ignore_case(blog_post::Column::SeoKeywords, &search)),
            );
        }
        if let Some(status) = filter.status {
            condition = condition.add(blog_post::Column::Status.eq(status.to_string()));
        }

        let db = &self.db;
        let (models, total) = retry::with_retry("list_posts", self.retry_config, || async {
            let paginator = blog_post::Entity::find()
                .filter(condition.clone())
                .order_by_desc(blog_post::Column::PublishedAt)
                .order_by_desc(blog_post::Column::CreatedAt)
                .order_by_desc(blog_post::Column::Id)
                .paginate(db, page_size);
            let total = paginator.num_items().await?;
            let models = paginator.fetch_page(page.saturating_sub(1)).await?;
            Ok((models, total))
        })
        .await?;

        Ok(Paged {
            items: models.into_iter().map(model_to_post).collect(),
            total,
        })
    }

    pub async fn get_post(&self, id: i32) -> Result<Option<BlogPost>> {
        let db = &self.db;
        let model = retry::with_retry(&format!("get_post({})", id), self.retry_config, || {
            blog_post::Entity::find_by_id(id).one(db)
        })
        .await?;
        Ok(model.map(model_to_post))
    }

    pub async fn find_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let db = &self.db;
        let model = retry::with_retry("find_post_by_slug", self.retry_config, || {
            blog_post::Entity::find()
                .filter(blog_post::Column::Slug.eq(slug))
                .one(db)
        })
        .await?;
        Ok(model.map(model_to_post))
    }

    pub async fn insert_post(
        &self,
        draft: &PostDraft,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<BlogPost> {
        let db = &self.db;
        let now = Utc::now();
        let model = retry::with_retry_non_idempotent("insert_post", self.retry_config, || {
            post_draft_to_active_model(draft, published_at, now, true).insert(db)
        })
        .await?;

        info!("Blog post created: {} ({})", model.id, model.slug);
        Ok(model_to_post(model))
    }

    pub async fn update_post(
        &self,
        id: i32,
        draft: &PostDraft,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<BlogPost> {
        let db = &self.db;
        let now = Utc::now();
        let result = retry::with_retry(&format!("update_post({})", id), self.retry_config, || {
            let mut active = post_draft_to_active_model(draft, published_at, now, false);
            active.id = Set(id);
            active.update(db)
        })
        .await;

        match result {
            Ok(model) => {
                info!("Blog post updated: {} ({})", model.id, model.slug);
                Ok(model_to_post(model))
            }
            Err(DbErr::RecordNotUpdated) => {
                Err(StoreError::not_found(format!("Blog post not found: {}", id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_post(&self, id: i32) -> Result<()> {
        let db = &self.db;
        let result = retry::with_retry(&format!("delete_post({})", id), self.retry_config, || {
            blog_post::Entity::delete_by_id(id).exec(db)
        })
        .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found(format!("Blog post not found: {}", id)));
        }
        info!("Blog post deleted: {}", id);
        Ok(())
    }

    /// Atomic `view_count = view_count + 1` on a published post
    pub async fn record_post_view(&self, id: i32) -> Result<()> {
        let db = &self.db;
        retry::with_retry_non_idempotent(
            &format!("record_post_view({})", id),
            self.retry_config,
            || {
                blog_post::Entity::update_many()
                    .col_expr(
                        blog_post::Column::ViewCount,
                        Expr::col(blog_post::Column::ViewCount).add(1i64),
                    )
                    .filter(blog_post::Column::Id.eq(id))
                    .filter(blog_post::Column::Status.eq(PostStatus::Published.to_string()))
                    .exec(db)
            },
        )
        .await?;
        Ok(())
    }
}
