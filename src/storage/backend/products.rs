//! Product table operations

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use tracing::{info, trace};

use super::converters::{model_to_product, product_draft_to_active_model};
use super::{SeaOrmStorage, contains_ignore_case, retry, search_term};
use crate::errors::{Result, StoreError};
use crate::storage::models::{Paged, Product, ProductDraft, ProductFilter};

use migration::entities::product;

impl SeaOrmStorage {
    /// Products ordered for display: `sort_order`, then `id`
    pub async fn list_products(
        &self,
        filter: &ProductFilter,
        page: u64,
        page_size: u64,
    ) -> Result<Paged<Product>> {
        let mut condition = Condition::all();
        if let Some(search) = search_term(&filter.search) {
            condition = condition.add(
                Condition::any()
                    .add(contains_ignore_case(product::Column::Name, &search))
                    .add(contains_ignore_case(product::Column::Description, &search)),
            );
        }
        if let Some(category) = filter.category {
            condition = condition.add(product::Column::Category.eq(category.to_string()));
        }
        if filter.active_only {
            condition = condition.add(product::Column::Active.eq(true));
        }

        let db = &self.db;
        let (models, total) = retry::with_retry("list_products", self.retry_config, || async {
            let paginator = product::Entity::find()
                .filter(condition.clone())
                .order_by_asc(product::Column::SortOrder)
                .order_by_asc(product::Column::Id)
                .paginate(db, page_size);
            let total = paginator.num_items().await?;
            let models = paginator.fetch_page(page.saturating_sub(1)).await?;
            Ok((models, total))
        })
        .await?;

        trace!("Loaded {} products (total {})", models.len(), total);
        Ok(Paged {
            items: models.into_iter().map(model_to_product).collect(),
            total,
        })
    }

    pub async fn get_product(&self, id: i32) -> Result<Option<Product>> {
        let db = &self.db;
        let model = retry::with_retry(&format!("get_product({})", id), self.retry_config, || {
            product::Entity::find_by_id(id).one(db)
        })
        .await?;
        Ok(model.map(model_to_product))
    }

    /// Fetch several products at once, in no particular order
    pub async fn find_products_by_ids(&self, ids: &[i32]) -> Result<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let db = &self.db;
        let models = retry::with_retry("find_products_by_ids", self.retry_config, || {
            product::Entity::find()
                .filter(product::Column::Id.is_in(ids.iter().copied()))
                .all(db)
        })
        .await?;
        Ok(models.into_iter().map(model_to_product).collect())
    }

    pub async fn insert_product(&self, draft: &ProductDraft) -> Result<Product> {
        let db = &self.db;
        let now = Utc::now();
        let model = retry::with_retry_non_idempotent("insert_product", self.retry_config, || {
            product_draft_to_active_model(draft, now, true).insert(db)
        })
        .await?;

        info!("Product created: {} ({})", model.id, model.name);
        Ok(model_to_product(model))
    }

    pub async fn update_product(&self, id: i32, draft: &ProductDraft) -> Result<Product> {
        let db = &self.db;
        let now = Utc::now();
        let result = retry::with_retry(
            &format!("update_product({})", id),
            self.retry_config,
            || {
                let mut active = product_draft_to_active_model(draft, now, false);
                active.id = Set(id);
                active.update(db)
            },
        )
        .await;

        match result {
            Ok(model) => {
                info!("Product updated: {}", id);
                Ok(model_to_product(model))
            }
            Err(DbErr::RecordNotUpdated) => {
                Err(StoreError::not_found(format!("Product not found: {}", id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_product(&self, id: i32) -> Result<()> {
        let db = &self.db;
        let result = retry::with_retry(
            &format!("delete_product({})", id),
            self.retry_config,
            || product::Entity::delete_by_id(id).exec(db),
        )
        .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found(format!("Product not found: {}", id)));
        }
        info!("Product deleted: {}", id);
        Ok(())
    }

    pub async fn count_products(&self) -> Result<u64> {
        let db = &self.db;
        Ok(
            retry::with_retry("count_products", self.retry_config, || {
                product::Entity::find().count(db)
            })
            .await?,
        )
    }
}
