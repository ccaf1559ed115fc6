//! Redirect table operations

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DbErr, EntityTrait, ExprTrait,
    PaginatorTrait, QueryFilter, QueryOrder, sea_query::Expr,
};
use tracing::{debug, info};

use super::converters::{model_to_redirect, redirect_draft_to_active_model};
use super::{SeaOrmStorage, contains_ignore_case, retry, search_term};
use crate::errors::{Result, StoreError};
use crate::storage::models::{Paged, Redirect, RedirectDraft};

use migration::entities::redirect;

impl SeaOrmStorage {
    pub async fn list_redirects(
        &self,
        search: &Option<String>,
        page: u64,
        page_size: u64,
    ) -> Result<Paged<Redirect>> {
        let mut condition = Condition::all();
        if let Some(search) = search_term(search) {
            condition = condition.add(
                Condition::any()
                    .add(contains_ignore_case(redirect::Column::FromPath, &search))
                    .add(contains_ignore_case(redirect::Column::ToPath, &search)),
            );
        }

        let db = &self.db;
        let (models, total) = retry::with_retry("list_redirects", self.retry_config, || async {
            let paginator = redirect::Entity::find()
                .filter(condition.clone())
                .order_by_asc(redirect::Column::FromPath)
                .paginate(db, page_size);
            let total = paginator.num_items().await?;
            let models = paginator.fetch_page(page.saturating_sub(1)).await?;
            Ok((models, total))
        })
        .await?;

        Ok(Paged {
            items: models.into_iter().map(model_to_redirect).collect(),
            total,
        })
    }

    pub async fn get_redirect(&self, id: i32) -> Result<Option<Redirect>> {
        let db = &self.db;
        let model = retry::with_retry(&format!("get_redirect({})", id), self.retry_config, || {
            redirect::Entity::find_by_id(id).one(db)
        })
        .await?;
        Ok(model.map(model_to_redirect))
    }

    /// Lookup by normalized source path, active or not
    pub async fn find_redirect_by_path(&self, from_path: &str) -> Result<Option<Redirect>> {
        let db = &self.db;
        let model = retry::with_retry("find_redirect_by_path", self.retry_config, || {
            redirect::Entity::find()
                .filter(redirect::Column::FromPath.eq(from_path))
                .one(db)
        })
        .await?;
        Ok(model.map(model_to_redirect))
    }

    pub async fn insert_redirect(&self, draft: &RedirectDraft) -> Result<Redirect> {
        let db = &self.db;
        let now = Utc::now();
        let model = retry::with_retry_non_idempotent("insert_redirect", self.retry_config, || {
            redirect_draft_to_active_model(draft, now, true).insert(db)
        })
        .await?;

        info!("Redirect created: {} -> {}", model.from_path, model.to_path);
        Ok(model_to_redirect(model))
    }

    pub async fn update_redirect(&self, id: i32, draft: &RedirectDraft) -> Result<Redirect> {
        let db = &self.db;
        let now = Utc::now();
        let result = retry::with_retry(
            &format!("update_redirect({})", id),
            self.retry_config,
            || {
                let mut active = redirect_draft_to_active_model(draft, now, false);
                active.id = Set(id);
                active.update(db)
            },
        )
        .await;

        match result {
            Ok(model) => {
                info!("Redirect updated: {} -> {}", model.from_path, model.to_path);
                Ok(model_to_redirect(model))
            }
            Err(DbErr::RecordNotUpdated) => {
                Err(StoreError::not_found(format!("Redirect not found: {}", id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_redirect(&self, id: i32) -> Result<()> {
        let db = &self.db;
        let result = retry::with_retry(
            &format!("delete_redirect({})", id),
            self.retry_config,
            || redirect::Entity::delete_by_id(id).exec(db),
        )
        .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found(format!("Redirect not found: {}", id)));
        }
        info!("Redirect deleted: {}", id);
        Ok(())
    }

    /// Atomic `hit_count = hit_count + 1`
    pub async fn record_redirect_hit(&self, id: i32) -> Result<()> {
        let db = &self.db;
        retry::with_retry_non_idempotent(
            &format!("record_redirect_hit({})", id),
            self.retry_config,
            || {
                redirect::Entity::update_many()
                    .col_expr(
                        redirect::Column::HitCount,
                        Expr::col(redirect::Column::HitCount).add(1i64),
                    )
                    .filter(redirect::Column::Id.eq(id))
                    .exec(db)
            },
        )
        .await?;

        debug!("Redirect hit recorded: {}", id);
        Ok(())
    }
}
