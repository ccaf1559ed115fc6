//! Sea-ORM Model ↔ domain conversions
//!
//! Enum columns are stored as lowercase strings. An unknown value read back
//! from the database falls back to the enum default and is logged.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use tracing::warn;

use crate::storage::models::*;
use migration::entities::{affiliate, blog_post, product, promotion, redirect, review};

fn parse_enum<T: FromStr + Default>(column: &str, raw: &str) -> T {
    raw.parse().unwrap_or_else(|_| {
        warn!("Unknown {} value in database: '{}'", column, raw);
        T::default()
    })
}

pub fn model_to_product(model: product::Model) -> Product {
    let features: Vec<String> = serde_json::from_str(&model.features).unwrap_or_else(|e| {
        warn!("Invalid features JSON for product {}: {}", model.id, e);
        Vec::new()
    });

    Product {
        id: model.id,
        name: model.name,
        price_cents: model.price_cents,
        description: model.description,
        features,
        category: parse_enum("category", &model.category),
        badge: model.badge,
        image_url: model.image_url,
        active: model.active,
        sort_order: model.sort_order,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// Build an ActiveModel from a draft. `id` is left unset so the same value
/// serves inserts (autoincrement) and updates (combined with `id: Set`).
pub fn product_draft_to_active_model(
    draft: &ProductDraft,
    now: DateTime<Utc>,
    is_new: bool,
) -> product::ActiveModel {
    product::ActiveModel {
        id: NotSet,
        name: Set(draft.name.clone()),
        price_cents: Set(draft.price_cents),
        description: Set(draft.description.clone()),
        features: Set(serde_json::to_string(&draft.features).unwrap_or_else(|_| "[]".into())),
        category: Set(draft.category.to_string()),
        badge: Set(draft.badge.clone()),
        image_url: Set(draft.image_url.clone()),
        active: Set(draft.active),
        sort_order: Set(draft.sort_order),
        created_at: if is_new { Set(now) } else { NotSet },
        updated_at: Set(now),
    }
}

pub fn model_to_promotion(model: promotion::Model) -> Promotion {
    Promotion {
        id: model.id,
        code: model.code,
        discount_type: parse_enum("discount_type", &model.discount_type),
        value: model.value,
        min_purchase_cents: model.min_purchase_cents,
        max_uses: model.max_uses,
        used_count: model.used_count,
        starts_at: model.starts_at,
        ends_at: model.ends_at,
        active: model.active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn promotion_draft_to_active_model(
    draft: &PromotionDraft,
    now: DateTime<Utc>,
    is_new: bool,
) -> promotion::ActiveModel {
    promotion::ActiveModel {
        id: NotSet,
        code: Set(draft.code.clone()),
        discount_type: Set(draft.discount_type.to_string()),
        value: Set(draft.value),
        min_purchase_cents: Set(draft.min_purchase_cents),
        max_uses: Set(draft.max_uses),
        used_count: if is_new { Set(0) } else { NotSet },
        starts_at: Set(draft.starts_at),
        ends_at: Set(draft.ends_at),
        active: Set(draft.active),
        created_at: if is_new { Set(now) } else { NotSet },
        updated_at: Set(now),
    }
}

pub fn model_to_redirect(model: redirect::Model) -> Redirect {
    Redirect {
        id: model.id,
        from_path: model.from_path,
        to_path: model.to_path,
        status_code: u16::try_from(model.status_code).unwrap_or(301),
        active: model.active,
        hit_count: model.hit_count.max(0),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn redirect_draft_to_active_model(
    draft: &RedirectDraft,
    now: DateTime<Utc>,
    is_new: bool,
) -> redirect::ActiveModel {
    redirect::ActiveModel {
        id: NotSet,
        from_path: Set(draft.from_path.clone()),
        to_path: Set(draft.to_path.clone()),
        status_code: Set(draft.status_code as i32),
        active: Set(draft.active),
        hit_count: if is_new { Set(0) } else { NotSet },
        created_at: if is_new { Set(now) } else { NotSet },
        updated_at: Set(now),
    }
}

pub fn model_to_post(model: blog_post::Model) -> BlogPost {
    BlogPost {
        id: model.id,
        title: model.title,
        slug: model.slug,
        excerpt: model.excerpt,
        content: model.content,
        author: model.author,
        seo_title: model.seo_title,
        seo_description: model.seo_description,
        seo_keywords: model.seo_keywords,
        status: parse_enum("status", &model.status),
        view_count: model.view_count.max(0),
        published_at: model.published_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// `published_at` is decided by the caller: it is only stamped on the first
/// transition to published and kept afterwards.
pub fn post_draft_to_active_model(
    draft: &PostDraft,
    published_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    is_new: bool,
) -> blog_post::ActiveModel {
    blog_post::ActiveModel {
        id: NotSet,
        title: Set(draft.title.clone()),
        slug: Set(draft.slug.clone()),
        excerpt: Set(draft.excerpt.clone()),
        content: Set(draft.content.clone()),
        author: Set(draft.author.clone()),
        seo_title: Set(draft.seo_title.clone()),
        seo_description: Set(draft.seo_description.clone()),
        seo_keywords: Set(draft.seo_keywords.clone()),
        status: Set(draft.status.to_string()),
        view_count: if is_new { Set(0) } else { NotSet },
        published_at: Set(published_at),
        created_at: if is_new { Set(now) } else { NotSet },
        updated_at: Set(now),
    }
}

pub fn model_to_affiliate(model: affiliate::Model) -> Affiliate {
    Affiliate {
        id: model.id,
        name: model.name,
        email: model.email,
        code: model.code,
        commission_bps: model.commission_bps,
        total_sales_cents: model.total_sales_cents,
        total_commission_cents: model.total_commission_cents,
        active: model.active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn affiliate_draft_to_active_model(
    draft: &AffiliateDraft,
    code: &str,
    now: DateTime<Utc>,
    is_new: bool,
) -> affiliate::ActiveModel {
    affiliate::ActiveModel {
        id: NotSet,
        name: Set(draft.name.clone()),
        email: Set(draft.email.clone()),
        code: Set(code.to_string()),
        commission_bps: Set(draft.commission_bps),
        total_sales_cents: if is_new { Set(0) } else { NotSet },
        total_commission_cents: if is_new { Set(0) } else { NotSet },
        active: Set(draft.active),
        created_at: if is_new { Set(now) } else { NotSet },
        updated_at: Set(now),
    }
}

pub fn model_to_review(model: review::Model) -> Review {
    Review {
        id: model.id,
        product_id: model.product_id,
        author_name: model.author_name,
        rating: model.rating,
        title: model.title,
        body: model.body,
        status: parse_enum("status", &model.status),
        featured: model.featured,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn review_draft_to_active_model(
    draft: &ReviewDraft,
    now: DateTime<Utc>,
    is_new: bool,
) -> review::ActiveModel {
    review::ActiveModel {
        id: NotSet,
        product_id: Set(draft.product_id),
        author_name: Set(draft.author_name.clone()),
        rating: Set(draft.rating),
        title: Set(draft.title.clone()),
        body: Set(draft.body.clone()),
        status: Set(draft.status.to_string()),
        featured: Set(draft.featured),
        created_at: if is_new { Set(now) } else { NotSet },
        updated_at: Set(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn product_model() -> product::Model {
        let now = Utc::now();
        product::Model {
            id: 7,
            name: "Fire TV Stick 4K".to_string(),
            price_cents: 4999,
            description: "Streaming stick".to_string(),
            features: r#"["4K Ultra HD","Alexa Voice Remote"]"#.to_string(),
            category: "firestick".to_string(),
            badge: Some("Best Seller".to_string()),
            image_url: None,
            active: true,
            sort_order: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_model_to_product_parses_features_and_category() {
        let product = model_to_product(product_model());
        assert_eq!(product.id, 7);
        assert_eq!(product.features, vec!["4K Ultra HD", "Alexa Voice Remote"]);
        assert_eq!(product.category, ProductCategory::Firestick);
        assert_eq!(product.badge.as_deref(), Some("Best Seller"));
    }

    #[test]
    fn test_model_to_product_tolerates_bad_data() {
        let mut model = product_model();
        model.features = "not json".to_string();
        model.category = "toaster".to_string();
        let product = model_to_product(model);
        assert!(product.features.is_empty());
        assert_eq!(product.category, ProductCategory::default());
    }

    #[test]
    fn test_product_draft_update_keeps_created_at() {
        let draft = ProductDraft {
            name: "IPTV 1 Year".to_string(),
            price_cents: 8000,
            description: String::new(),
            features: vec!["HD channels".to_string()],
            category: ProductCategory::Iptv,
            badge: None,
            image_url: None,
            active: true,
            sort_order: 3,
        };
        let now = Utc::now();

        let insert = product_draft_to_active_model(&draft, now, true);
        assert!(matches!(insert.created_at, ActiveValue::Set(_)));
        if let ActiveValue::Set(category) = insert.category {
            assert_eq!(category, "iptv");
        }
        if let ActiveValue::Set(features) = insert.features {
            assert_eq!(features, r#"["HD channels"]"#);
        }

        let update = product_draft_to_active_model(&draft, now, false);
        assert!(matches!(update.created_at, ActiveValue::NotSet));
        assert!(matches!(update.id, ActiveValue::NotSet));
    }

    #[test]
    fn test_promotion_update_preserves_counter() {
        let draft = PromotionDraft {
            code: "WELCOME10".to_string(),
            discount_type: DiscountType::Percentage,
            value: 1000,
            min_purchase_cents: 0,
            max_uses: Some(100),
            starts_at: None,
            ends_at: None,
            active: true,
        };
        let update = promotion_draft_to_active_model(&draft, Utc::now(), false);
        assert!(matches!(update.used_count, ActiveValue::NotSet));
        assert!(matches!(update.discount_type, ActiveValue::Set(_)));
        if let ActiveValue::Set(kind) = update.discount_type {
            assert_eq!(kind, "percentage");
        }
    }

    #[test]
    fn test_model_to_redirect_clamps_counters() {
        let now = Utc::now();
        let redirect = model_to_redirect(redirect::Model {
            id: 1,
            from_path: "/old".to_string(),
            to_path: "/new".to_string(),
            status_code: 302,
            active: true,
            hit_count: -4,
            created_at: now,
            updated_at: now,
        });
        assert_eq!(redirect.status_code, 302);
        assert_eq!(redirect.hit_count, 0);
    }

    #[test]
    fn test_model_to_review_status() {
        let now = Utc::now();
        let review = model_to_review(review::Model {
            id: 3,
            product_id: Some(1),
            author_name: "Sam".to_string(),
            rating: 5,
            title: None,
            body: "Works great".to_string(),
            status: "approved".to_string(),
            featured: true,
            created_at: now,
            updated_at: now,
        });
        assert_eq!(review.status, ReviewStatus::Approved);
        assert!(review.featured);
    }
}
