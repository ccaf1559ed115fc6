//! Dashboard aggregates

use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Select,
};

use super::{SeaOrmStorage, retry};
use crate::errors::Result;
use crate::storage::models::{DashboardStats, PostStatus, ReviewStatus};

use migration::entities::{affiliate, blog_post, product, promotion, redirect, review};

impl SeaOrmStorage {
    async fn count_where<E>(&self, name: &str, select: Select<E>) -> Result<u64>
    where
        E: EntityTrait,
        E::Model: Send + Sync,
    {
        let db = &self.db;
        Ok(
            retry::with_retry(name, self.retry_config, || select.clone().count(db))
                .await?,
        )
    }

    /// 读取单列整数并在内存中求和。SUM 在不同数据库上返回的类型不一致
    /// (Postgres 对 BIGINT 返回 NUMERIC)，逐行读取可以避开解码差异。
    async fn sum_column<E, C>(
        &self,
        name: &str,
        column: C,
        condition: Condition,
    ) -> Result<i64>
    where
        E: EntityTrait,
        C: ColumnTrait,
    {
        let db = &self.db;
        let values: Vec<i64> = retry::with_retry(name, self.retry_config, || {
            E::find()
                .select_only()
                .column(column)
                .filter(condition.clone())
                .into_tuple::<i64>()
                .all(db)
        })
        .await?;
        Ok(values.iter().sum())
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let products_total = self.count_products().await?;
        let products_active = self
            .count_where(
                "count_active_products",
                product::Entity::find().filter(product::Column::Active.eq(true)),
            )
            .await?;

        let promotions_total = self
            .count_where("count_promotions", promotion::Entity::find())
            .await?;
        let promotions_live = self.count_live_promotions().await?;

        let posts_published = self
            .count_where(
                "count_published_posts",
                blog_post::Entity::find()
                    .filter(blog_post::Column::Status.eq(PostStatus::Published.to_string())),
            )
            .await?;
        let posts_draft = self
            .count_where(
                "count_draft_posts",
                blog_post::Entity::find()
                    .filter(blog_post::Column::Status.eq(PostStatus::Draft.to_string())),
            )
            .await?;
        let blog_views = self
            .sum_column::<blog_post::Entity, _>(
                "sum_blog_views",
                blog_post::Column::ViewCount,
                Condition::all(),
            )
            .await?;

        let reviews_pending = self
            .count_where(
                "count_pending_reviews",
                review::Entity::find()
                    .filter(review::Column::Status.eq(ReviewStatus::Pending.to_string())),
            )
            .await?;
        let approved = Condition::all()
            .add(review::Column::Status.eq(ReviewStatus::Approved.to_string()));
        let reviews_approved = self
            .count_where(
                "count_approved_reviews",
                review::Entity::find().filter(approved.clone()),
            )
            .await?;
        let db = &self.db;
        let ratings: Vec<i32> =
            retry::with_retry("approved_review_ratings", self.retry_config, || {
                review::Entity::find()
                    .select_only()
                    .column(review::Column::Rating)
                    .filter(approved.clone())
                    .into_tuple::<i32>()
                    .all(db)
            })
            .await?;
        let average_rating = average_rating(&ratings);

        let redirects_total = self
            .count_where("count_redirects", redirect::Entity::find())
            .await?;
        let redirect_hits = self
            .sum_column::<redirect::Entity, _>(
                "sum_redirect_hits",
                redirect::Column::HitCount,
                Condition::all(),
            )
            .await?;

        let affiliates_active = self
            .count_where(
                "count_active_affiliates",
                affiliate::Entity::find().filter(affiliate::Column::Active.eq(true)),
            )
            .await?;
        let affiliate_sales_cents = self
            .sum_column::<affiliate::Entity, _>(
                "sum_affiliate_sales",
                affiliate::Column::TotalSalesCents,
                Condition::all(),
            )
            .await?;
        let affiliate_commission_cents = self
            .sum_column::<affiliate::Entity, _>(
                "sum_affiliate_commission",
                affiliate::Column::TotalCommissionCents,
                Condition::all(),
            )
            .await?;

        Ok(DashboardStats {
            products_total,
            products_active,
            promotions_total,
            promotions_live,
            posts_published,
            posts_draft,
            blog_views,
            reviews_pending,
            reviews_approved,
            average_rating,
            redirects_total,
            redirect_hits,
            affiliates_active,
            affiliate_sales_cents,
            affiliate_commission_cents,
        })
    }
}

/// 保留一位小数；没有评分时为 None
pub(crate) fn average_rating(ratings: &[i32]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    let avg = sum as f64 / ratings.len() as f64;
    Some((avg * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[5]), Some(5.0));
        assert_eq!(average_rating(&[5, 4, 4]), Some(4.3));
        assert_eq!(average_rating(&[1, 2]), Some(1.5));
    }
}
