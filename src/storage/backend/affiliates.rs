//! Affiliate table operations

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DbErr, EntityTrait, ExprTrait,
    PaginatorTrait, QueryFilter, QueryOrder, sea_query::Expr,
};
use tracing::info;

use super::converters::{affiliate_draft_to_active_model, model_to_affiliate};
use super::{SeaOrmStorage, contains_ignore_case, retry, search_term};
use crate::errors::{Result, StoreError};
use crate::storage::models::{Affiliate, AffiliateDraft, Paged};

use migration::entities::affiliate;

impl SeaOrmStorage {
    pub async fn list_affiliates(
        &self,
        search: &Option<String>,
        page: u64,
        page_size: u64,
    ) -> Result<Paged<Affiliate>> {
        let mut condition = Condition::all();
        if let Some(search) = search_term(search) {
            condition = condition.add(
                Condition::any()
                    .add(contains_ignore_case(affiliate::Column::Name, &search))
                    .add(contains_ignore_case(affiliate::Column::Email, &search))
                    .add(contains_ignore_case(affiliate::Column::Code, &search)),
            );
        }

        let db = &self.db;
        let (models, total) = retry::with_retry("list_affiliates", self.retry_config, || async {
            let paginator = affiliate::Entity::find()
                .filter(condition.clone())
                .order_by_desc(affiliate::Column::TotalSalesCents)
                .order_by_asc(affiliate::Column::Id)
                .paginate(db, page_size);
            let total = paginator.num_items().await?;
            let models = paginator.fetch_page(page.saturating_sub(1)).await?;
            Ok((models, total))
        })
        .await?;

        Ok(Paged {
            items: models.into_iter().map(model_to_affiliate).collect(),
            total,
        })
    }

    pub async fn get_affiliate(&self, id: i32) -> Result<Option<Affiliate>> {
        let db = &self.db;
        let model = retry::with_retry(&format!("get_affiliate({})", id), self.retry_config, || {
            affiliate::Entity::find_by_id(id).one(db)
        })
        .await?;
        Ok(model.map(model_to_affiliate))
    }

    pub async fn affiliate_code_exists(&self, code: &str) -> Result<bool> {
        let db = &self.db;
        let count = retry::with_retry("affiliate_code_exists", self.retry_config, || {
            affiliate::Entity::find()
                .filter(affiliate::Column::Code.eq(code))
                .count(db)
        })
        .await?;
        Ok(count > 0)
    }

    pub async fn insert_affiliate(&self, draft: &AffiliateDraft, code: &str) -> Result<Affiliate> {
        let db = &self.db;
        let now = Utc::now();
        let model = retry::with_retry_non_idempotent("insert_affiliate", self.retry_config, || {
            affiliate_draft_to_active_model(draft, code, now, true).insert(db)
        })
        .await?;

        info!("Affiliate created: {} ({})", model.name, model.code);
        Ok(model_to_affiliate(model))
    }

    pub async fn update_affiliate(
        &self,
        id: i32,
        draft: &AffiliateDraft,
        code: &str,
    ) -> Result<Affiliate> {
        let db = &self.db;
        let now = Utc::now();
        let result = retry::with_retry(
            &format!("update_affiliate({})", id),
            self.retry_config,
            || {
                let mut active = affiliate_draft_to_active_model(draft, code, now, false);
                active.id = Set(id);
                active.update(db)
            },
        )
        .await;

        match result {
            Ok(model) => {
                info!("Affiliate updated: {} ({})", model.name, model.code);
                Ok(model_to_affiliate(model))
            }
            Err(DbErr::RecordNotUpdated) => {
                Err(StoreError::not_found(format!("Affiliate not found: {}", id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_affiliate(&self, id: i32) -> Result<()> {
        let db = &self.db;
        let result = retry::with_retry(
            &format!("delete_affiliate({})", id),
            self.retry_config,
            || affiliate::Entity::delete_by_id(id).exec(db),
        )
        .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found(format!("Affiliate not found: {}", id)));
        }
        info!("Affiliate deleted: {}", id);
        Ok(())
    }

    /// Add a sale and its commission to the running totals in one UPDATE.
    /// Returns `false` when no affiliate has this id.
    pub async fn add_affiliate_sale(
        &self,
        id: i32,
        amount_cents: i64,
        commission_cents: i64,
    ) -> Result<bool> {
        let db = &self.db;
        let now = Utc::now();
        let result = retry::with_retry_non_idempotent(
            &format!("add_affiliate_sale({})", id),
            self.retry_config,
            || {
                affiliate::Entity::update_many()
                    .col_expr(
                        affiliate::Column::TotalSalesCents,
                        Expr::col(affiliate::Column::TotalSalesCents).add(amount_cents),
                    )
                    .col_expr(
                        affiliate::Column::TotalCommissionCents,
                        Expr::col(affiliate::Column::TotalCommissionCents).add(commission_cents),
                    )
                    .col_expr(affiliate::Column::UpdatedAt, Expr::val(now).into())
                    .filter(affiliate::Column::Id.eq(id))
                    .exec(db)
            },
        )
        .await?;

        Ok(result.rows_affected > 0)
    }
}
