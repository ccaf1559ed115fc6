//! Promotion table operations

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DbErr, EntityTrait, ExprTrait,
    PaginatorTrait, QueryFilter, QueryOrder, sea_query::Expr,
};
use tracing::info;

use super::converters::{model_to_promotion, promotion_draft_to_active_model};
use super::{SeaOrmStorage, contains_ignore_case, retry, search_term};
use crate::errors::{Result, StoreError};
use crate::storage::models::{Paged, Promotion, PromotionDraft};

use migration::entities::promotion;

impl SeaOrmStorage {
    pub async fn list_promotions(
        &self,
        search: &Option<String>,
        page: u64,
        page_size: u64,
    ) -> Result<Paged<Promotion>> {
        let mut condition = Condition::all();
        if let Some(search) = search_term(search) {
            condition = condition.add(contains_ignore_case(promotion::Column::Code, &search));
        }

        let db = &self.db;
        let (models, total) = retry::with_retry("list_promotions", self.retry_config, || async {
            let paginator = promotion::Entity::find()
                .filter(condition.clone())
                .order_by_desc(promotion::Column::CreatedAt)
                .order_by_desc(promotion::Column::Id)
                .paginate(db, page_size);
            let total = paginator.num_items().await?;
            let models = paginator.fetch_page(page.saturating_sub(1)).await?;
            Ok((models, total))
        })
        .await?;

        Ok(Paged {
            items: models.into_iter().map(model_to_promotion).collect(),
            total,
        })
    }

    pub async fn get_promotion(&self, id: i32) -> Result<Option<Promotion>> {
        let db = &self.db;
        let model = retry::with_retry(&format!("get_promotion({})", id), self.retry_config, || {
            promotion::Entity::find_by_id(id).one(db)
        })
        .await?;
        Ok(model.map(model_to_promotion))
    }

    /// Codes are stored upper-cased, so callers pass the normalized code
    pub async fn find_promotion_by_code(&self, code: &str) -> Result<Option<Promotion>> {
        let db = &self.db;
        let model = retry::with_retry("find_promotion_by_code", self.retry_config, || {
            promotion::Entity::find()
                .filter(promotion::Column::Code.eq(code))
                .one(db)
        })
        .await?;
        Ok(model.map(model_to_promotion))
    }

    pub async fn insert_promotion(&self, draft: &PromotionDraft) -> Result<Promotion> {
        let db = &self.db;
        let now = Utc::now();
        let model = retry::with_retry_non_idempotent("insert_promotion", self.retry_config, || {
            promotion_draft_to_active_model(draft, now, true).insert(db)
        })
        .await?;

        info!("Promotion created: {}", model.code);
        Ok(model_to_promotion(model))
    }

    pub async fn update_promotion(&self, id: i32, draft: &PromotionDraft) -> Result<Promotion> {
        let db = &self.db;
        let now = Utc::now();
        let result = retry::with_retry(
            &format!("update_promotion({})", id),
            self.retry_config,
            || {
                let mut active = promotion_draft_to_active_model(draft, now, false);
                active.id = Set(id);
                active.update(db)
            },
        )
        .await;

        match result {
            Ok(model) => {
                info!("Promotion updated: {}", model.code);
                Ok(model_to_promotion(model))
            }
            Err(DbErr::RecordNotUpdated) => {
                Err(StoreError::not_found(format!("Promotion not found: {}", id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_promotion(&self, id: i32) -> Result<()> {
        let db = &self.db;
        let result = retry::with_retry(
            &format!("delete_promotion({})", id),
            self.retry_config,
            || promotion::Entity::delete_by_id(id).exec(db),
        )
        .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found(format!("Promotion not found: {}", id)));
        }
        info!("Promotion deleted: {}", id);
        Ok(())
    }

    /// Count one use of a promotion.
    ///
    /// The increment is a single conditional UPDATE, so concurrent redemptions
    /// can never push `used_count` past `max_uses`. Returns `false` when the
    /// limit was already reached.
    pub async fn increment_promotion_usage(&self, id: i32) -> Result<bool> {
        let db = &self.db;
        let now = Utc::now();
        let result = retry::with_retry_non_idempotent(
            &format!("increment_promotion_usage({})", id),
            self.retry_config,
            || {
                promotion::Entity::update_many()
                    .col_expr(
                        promotion::Column::UsedCount,
                        Expr::col(promotion::Column::UsedCount).add(1),
                    )
                    .col_expr(promotion::Column::UpdatedAt, Expr::val(now).into())
                    .filter(promotion::Column::Id.eq(id))
                    .filter(
                        Condition::any()
                            .add(promotion::Column::MaxUses.is_null())
                            .add(
                                Expr::col(promotion::Column::UsedCount)
                                    .lt(Expr::col(promotion::Column::MaxUses)),
                            ),
                    )
                    .exec(db)
            },
        )
        .await?;

        Ok(result.rows_affected > 0)
    }

    /// Promotions redeemable at `now`
    pub async fn count_live_promotions(&self) -> Result<u64> {
        let db = &self.db;
        let now = Utc::now();
        let condition = Condition::all()
            .add(promotion::Column::Active.eq(true))
            .add(
                Condition::any()
                    .add(promotion::Column::StartsAt.is_null())
                    .add(promotion::Column::StartsAt.lte(now)),
            )
            .add(
                Condition::any()
                    .add(promotion::Column::EndsAt.is_null())
                    .add(promotion::Column::EndsAt.gte(now)),
            )
            .add(
                Condition::any()
                    .add(promotion::Column::MaxUses.is_null())
                    .add(
                        Expr::col(promotion::Column::UsedCount)
                            .lt(Expr::col(promotion::Column::MaxUses)),
                    ),
            );

        Ok(
            retry::with_retry("count_live_promotions", self.retry_config, || {
                promotion::Entity::find().filter(condition.clone()).count(db)
            })
            .await?,
        )
    }
}
