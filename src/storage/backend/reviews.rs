//! Review table operations

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use tracing::info;

use super::converters::{model_to_review, review_draft_to_active_model};
use super::{SeaOrmStorage, contains_ignore_case, retry, search_term};
use crate::errors::{Result, StoreError};
use crate::storage::models::{Paged, Review, ReviewDraft, ReviewFilter};

use migration::entities::review;

impl SeaOrmStorage {
    /// Featured first, then newest
    pub async fn list_reviews(
        &self,
        filter: &ReviewFilter,
        page: u64,
        page_size: u64,
    ) -> Result<Paged<Review>> {
        let mut condition = Condition::all();
        if let Some(search) = search_term(&filter.search) {
            condition = condition.add(
                Condition::any()
                    .add(contains_ignore_case(review::Column::AuthorName, &search))
                    .add(contains_ignore_case(review::Column::Title, &search))
                    .add(contains_ignore_case(review::Column::Body, &search)),
            );
        }
        if let Some(product_id) = filter.product_id {
            condition = condition.add(review::Column::ProductId.eq(product_id));
        }
        if let Some(status) = filter.status {
            condition = condition.add(review::Column::Status.eq(status.to_string()));
        }

        let db = &self.db;
        let (models, total) = retry::with_retry("list_reviews", self.retry_config, || async {
            let paginator = review::Entity::find()
                .filter(condition.clone())
                .order_by_desc(review::Column::Featured)
                .order_by_desc(review::Column::CreatedAt)
                .order_by_desc(review::Column::Id)
                .paginate(db, page_size);
            let total = paginator.num_items().await?;
            let models = paginator.fetch_page(page.saturating_sub(1)).await?;
            Ok((models, total))
        })
        .await?;

        Ok(Paged {
            items: models.into_iter().map(model_to_review).collect(),
            total,
        })
    }

    pub async fn get_review(&self, id: i32) -> Result<Option<Review>> {
        let db = &self.db;
        let model = retry::with_retry(&format!("get_review({})", id), self.retry_config, || {
            review::Entity::find_by_id(id).one(db)
        })
        .await?;
        Ok(model.map(model_to_review))
    }

    pub async fn insert_review(&self, draft: &ReviewDraft) -> Result<Review> {
        let db = &self.db;
        let now = Utc::now();
        let model = retry::with_retry_non_idempotent("insert_review", self.retry_config, || {
            review_draft_to_active_model(draft, now, true).insert(db)
        })
        .await?;

        info!("Review created: {} (status {})", model.id, model.status);
        Ok(model_to_review(model))
    }

    pub async fn update_review(&self, id: i32, draft: &ReviewDraft) -> Result<Review> {
        let db = &self.db;
        let now = Utc::now();
        let result = retry::with_retry(&format!("update_review({})", id), self.retry_config, || {
            let mut active = review_draft_to_active_model(draft, now, false);
            active.id = Set(id);
            active.update(db)
        })
        .await;

        match result {
            Ok(model) => {
                info!("Review updated: {} (status {})", model.id, model.status);
                Ok(model_to_review(model))
            }
            Err(DbErr::RecordNotUpdated) => {
                Err(StoreError::not_found(format!("Review not found: {}", id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_review(&self, id: i32) -> Result<()> {
        let db = &self.db;
        let result = retry::with_retry(&format!("delete_review({})", id), self.retry_config, || {
            review::Entity::delete_by_id(id).exec(db)
        })
        .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found(format!("Review not found: {}", id)));
        }
        info!("Review deleted: {}", id);
        Ok(())
    }
}
