//! Service layer tests against a real SQLite database
//!
//! Each test gets its own database file so the tests stay independent.

use std::sync::{Arc, Once};

use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tempfile::TempDir;

use storefront::config::init_config;
use storefront::errors::StoreError;
use storefront::pricing::PromotionRejection;
use storefront::services::{
    AffiliateService, BlogService, CartLineRequest, CatalogService, PromotionService,
    RedirectService, ReviewService, seed_demo_data,
};
use storefront::storage::backend::SeaOrmStorage;
use storefront::storage::{PostStatus, ProductFilter, ReviewStatus};

// =============================================================================
// Test Setup
// =============================================================================

static INIT: Once = Once::new();

fn init_static_config() {
    INIT.call_once(|| {
        init_config(Some("nonexistent-test-config.toml"));
    });
}

async fn create_storage() -> (TempDir, Arc<SeaOrmStorage>) {
    init_static_config();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("services_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");
    (temp_dir, Arc::new(storage))
}

fn draft<T: DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("invalid draft")
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_product_crud() {
    let (_dir, storage) = create_storage().await;
    let catalog = CatalogService::new(storage);

    let created = catalog
        .save(
            None,
            draft(json!({
                "name": "  Fire TV Stick 4K  ",
                "price_cents": 4999,
                "category": "firestick",
                "features": ["4K Ultra HD", " ", "Dolby Vision"],
            })),
        )
        .await
        .unwrap();
    assert_eq!(created.name, "Fire TV Stick 4K");
    assert_eq!(created.features, vec!["4K Ultra HD", "Dolby Vision"]);
    assert!(created.active);

    let updated = catalog
        .save(
            Some(created.id),
            draft(json!({ "name": "Fire TV Stick 4K Max", "price_cents": 5999 })),
        )
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.price_cents, 5999);

    catalog.delete(created.id).await.unwrap();
    assert!(matches!(
        catalog.get(created.id).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        catalog.delete(created.id).await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_product_validation() {
    let (_dir, storage) = create_storage().await;
    let catalog = CatalogService::new(storage);

    let blank = catalog
        .save(None, draft(json!({ "name": "   ", "price_cents": 100 })))
        .await;
    assert!(matches!(blank, Err(StoreError::Validation(_))));

    let negative = catalog
        .save(None, draft(json!({ "name": "Stick", "price_cents": -1 })))
        .await;
    assert!(negative.is_err());

    let oversized = catalog
        .save(None, draft(json!({ "name": "Stick", "price_cents": i64::MAX / 2 })))
        .await;
    assert!(matches!(oversized, Err(StoreError::Pricing(_))));
}

#[tokio::test]
async fn test_inactive_products_hidden_from_storefront() {
    let (_dir, storage) = create_storage().await;
    let catalog = CatalogService::new(storage);

    let visible = catalog
        .save(None, draft(json!({ "name": "Visible", "price_cents": 1000 })))
        .await
        .unwrap();
    let hidden = catalog
        .save(
            None,
            draft(json!({ "name": "Hidden", "price_cents": 1000, "active": false })),
        )
        .await
        .unwrap();

    let active = catalog
        .list(
            &ProductFilter {
                active_only: true,
                ..Default::default()
            },
            1,
            20,
        )
        .await
        .unwrap();
    assert_eq!(active.total, 1);
    assert_eq!(active.items[0].id, visible.id);

    assert!(catalog.get_active(hidden.id).await.is_err());
    assert!(catalog.get(hidden.id).await.is_ok());
}

#[tokio::test]
async fn test_cart_quote_merges_lines() {
    let (_dir, storage) = create_storage().await;
    let catalog = CatalogService::new(storage);

    let stick = catalog
        .save(None, draft(json!({ "name": "Stick", "price_cents": 4999 })))
        .await
        .unwrap();

    let quote = catalog
        .quote_lines(&[
            CartLineRequest {
                product_id: stick.id,
                quantity: 1,
            },
            CartLineRequest {
                product_id: stick.id,
                quantity: 1,
            },
        ])
        .await
        .unwrap();
    assert_eq!(quote.lines.len(), 1);
    assert_eq!(quote.lines[0].quantity, 2);
    assert_eq!(quote.subtotal_cents, 8998);

    let too_many = catalog
        .quote_lines(&[CartLineRequest {
            product_id: stick.id,
            quantity: 6,
        }])
        .await;
    assert!(too_many.is_err());

    let unknown = catalog
        .quote_lines(&[CartLineRequest {
            product_id: 9999,
            quantity: 1,
        }])
        .await;
    assert!(matches!(unknown, Err(StoreError::NotFound(_))));
}

// =============================================================================
// Promotions
// =============================================================================

#[tokio::test]
async fn test_promotion_codes_are_unique_and_uppercased() {
    let (_dir, storage) = create_storage().await;
    let promotions = PromotionService::new(storage);

    let created = promotions
        .save(
            None,
            draft(json!({ "code": " save10 ", "discount_type": "percentage", "value": 1000 })),
        )
        .await
        .unwrap();
    assert_eq!(created.code, "SAVE10");

    let duplicate = promotions
        .save(
            None,
            draft(json!({ "code": "SAVE10", "discount_type": "fixed", "value": 500 })),
        )
        .await;
    assert!(matches!(duplicate, Err(StoreError::Conflict(_))));

    // Saving the same promotion under its own code is not a conflict
    promotions
        .save(
            Some(created.id),
            draft(json!({ "code": "save10", "discount_type": "percentage", "value": 1500 })),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_coupon_check_does_not_consume_uses() {
    let (_dir, storage) = create_storage().await;
    let promotions = PromotionService::new(storage);

    let promo = promotions
        .save(
            None,
            draft(json!({
                "code": "FIVEOFF",
                "discount_type": "fixed",
                "value": 500,
                "min_purchase_cents": 2000,
                "max_uses": 1,
            })),
        )
        .await
        .unwrap();

    let check = promotions.check("fiveoff", 4999).await.unwrap();
    assert_eq!(check.discount_cents, 500);
    assert_eq!(check.total_cents, 4499);
    assert_eq!(promotions.get(promo.id).await.unwrap().used_count, 0);

    let below = promotions.check("FIVEOFF", 1999).await;
    assert!(matches!(
        below,
        Err(StoreError::Promotion(PromotionRejection::BelowMinimum { .. }))
    ));

    let missing = promotions.check("NOPE", 4999).await;
    assert!(matches!(
        missing,
        Err(StoreError::Promotion(PromotionRejection::NotFound))
    ));
}

#[tokio::test]
async fn test_redeem_until_exhausted() {
    let (_dir, storage) = create_storage().await;
    let promotions = PromotionService::new(storage);

    let promo = promotions
        .save(
            None,
            draft(json!({ "code": "TWICE", "discount_type": "fixed", "value": 100, "max_uses": 2 })),
        )
        .await
        .unwrap();

    assert_eq!(promotions.redeem(promo.id).await.unwrap().used_count, 1);
    assert_eq!(promotions.redeem(promo.id).await.unwrap().used_count, 2);
    assert!(matches!(
        promotions.redeem(promo.id).await,
        Err(StoreError::Promotion(PromotionRejection::Exhausted))
    ));
}

#[tokio::test]
async fn test_scheduled_promotion_cannot_be_redeemed() {
    let (_dir, storage) = create_storage().await;
    let promotions = PromotionService::new(storage);

    let starts_at = Utc::now() + Duration::days(2);
    let promo = promotions
        .save(
            None,
            draft(json!({
                "code": "LATER",
                "discount_type": "fixed",
                "value": 100,
                "starts_at": starts_at,
            })),
        )
        .await
        .unwrap();

    assert!(matches!(
        promotions.redeem(promo.id).await,
        Err(StoreError::Promotion(PromotionRejection::NotStarted))
    ));
}

// =============================================================================
// Redirects
// =============================================================================

#[tokio::test]
async fn test_redirect_resolution_counts_hits() {
    let (_dir, storage) = create_storage().await;
    let redirects = RedirectService::new(storage);

    let created = redirects
        .save(
            None,
            draft(json!({ "from_path": "/old-page/", "to_path": "/new-page" })),
        )
        .await
        .unwrap();
    assert_eq!(created.from_path, "/old-page");
    assert_eq!(created.status_code, 301);

    let hit = redirects.resolve("/old-page?utm=x").await.unwrap().unwrap();
    assert_eq!(hit.to_path, "/new-page");
    redirects.resolve("/old-page").await.unwrap();
    assert_eq!(redirects.get(created.id).await.unwrap().hit_count, 2);

    assert!(redirects.resolve("/unknown").await.unwrap().is_none());
}

#[tokio::test]
async fn test_redirect_validation() {
    let (_dir, storage) = create_storage().await;
    let redirects = RedirectService::new(storage);

    for (from, to, status) in [
        ("no-slash", "/x", 301),
        ("/loop", "/loop/", 301),
        ("/a", "javascript:alert(1)", 301),
        ("/a", "/b", 307),
    ] {
        let result = redirects
            .save(
                None,
                draft(json!({ "from_path": from, "to_path": to, "status_code": status })),
            )
            .await;
        assert!(
            matches!(result, Err(StoreError::InvalidRedirect(_))),
            "{} -> {} ({}) should be rejected",
            from,
            to,
            status
        );
    }
}

#[tokio::test]
async fn test_inactive_redirect_is_ignored() {
    let (_dir, storage) = create_storage().await;
    let redirects = RedirectService::new(storage);

    redirects
        .save(
            None,
            draft(json!({ "from_path": "/promo", "to_path": "https://partner.example/deal", "active": false })),
        )
        .await
        .unwrap();
    assert!(redirects.resolve("/promo").await.unwrap().is_none());
}

// =============================================================================
// Blog
// =============================================================================

#[tokio::test]
async fn test_post_slug_and_publication() {
    let (_dir, storage) = create_storage().await;
    let blog = BlogService::new(storage);

    let post = blog
        .save(
            None,
            draft(json!({ "title": "Set Up Your Fire Stick in 5 Minutes", "content": "word ".repeat(450) })),
        )
        .await
        .unwrap();
    assert_eq!(post.status, PostStatus::Draft);
    assert!(post.published_at.is_none());
    assert!(!post.slug.is_empty());
    assert!(post.slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));

    // Drafts are invisible to readers
    assert!(blog.read_published(&post.slug).await.is_err());

    let published = blog
        .save(
            Some(post.id),
            draft(json!({
                "title": post.title.clone(),
                "slug": post.slug.clone(),
                "content": post.content.clone(),
                "status": "published",
            })),
        )
        .await
        .unwrap();
    let first_published_at = published.published_at.expect("published_at stamped");

    let view = blog.read_published(&published.slug).await.unwrap();
    assert_eq!(view.post.view_count, 1);
    assert!(view.reading_minutes >= 2);

    // Re-saving keeps the original publication date
    let again = blog
        .save(
            Some(post.id),
            draft(json!({
                "title": "Updated title",
                "slug": published.slug.clone(),
                "status": "published",
            })),
        )
        .await
        .unwrap();
    assert_eq!(again.published_at, Some(first_published_at));
}

#[tokio::test]
async fn test_duplicate_slug_conflicts() {
    let (_dir, storage) = create_storage().await;
    let blog = BlogService::new(storage);

    blog.save(None, draft(json!({ "title": "Best IPTV Plans" })))
        .await
        .unwrap();
    let duplicate = blog
        .save(None, draft(json!({ "title": "Best IPTV plans!" })))
        .await;
    assert!(matches!(duplicate, Err(StoreError::Conflict(_))));
}

// =============================================================================
// Affiliates
// =============================================================================

#[tokio::test]
async fn test_affiliate_code_and_sales() {
    let (_dir, storage) = create_storage().await;
    let affiliates = AffiliateService::new(storage);

    let affiliate = affiliates
        .save(
            None,
            draft(json!({ "name": "Stream Reviews", "commission_bps": 1000 })),
        )
        .await
        .unwrap();
    assert!(affiliate.code.starts_with("STREAM-"));

    let credited = affiliates.record_sale(affiliate.id, 4999).await.unwrap();
    assert_eq!(credited.total_sales_cents, 4999);
    assert_eq!(credited.total_commission_cents, 500);

    let credited = affiliates.record_sale(affiliate.id, 1000).await.unwrap();
    assert_eq!(credited.total_sales_cents, 5999);
    assert_eq!(credited.total_commission_cents, 600);

    assert!(affiliates.record_sale(affiliate.id, 0).await.is_err());
}

#[tokio::test]
async fn test_inactive_affiliate_cannot_earn() {
    let (_dir, storage) = create_storage().await;
    let affiliates = AffiliateService::new(storage);

    let affiliate = affiliates
        .save(
            None,
            draft(json!({ "name": "Dormant", "code": "dormant-1", "active": false })),
        )
        .await
        .unwrap();
    assert_eq!(affiliate.code, "DORMANT-1");
    let err = affiliates.record_sale(affiliate.id, 1000).await.unwrap_err();
    assert!(matches!(err, StoreError::AffiliateInactive(_)));
    assert_eq!(affiliates.get(affiliate.id).await.unwrap().total_sales_cents, 0);
}

#[tokio::test]
async fn test_affiliate_search_ignores_case() {
    let (_dir, storage) = create_storage().await;
    let affiliates = AffiliateService::new(storage);

    affiliates
        .save(
            None,
            draft(json!({ "name": "Cord Cutters Weekly", "email": "Team@CordCutters.example", "code": "cord-7" })),
        )
        .await
        .unwrap();
    affiliates
        .save(None, draft(json!({ "name": "Budget Streams", "code": "budget-1" })))
        .await
        .unwrap();

    for term in ["cord cutters", "WEEKLY", "team@cordcutters", "cord-7"] {
        let page = affiliates.list(&Some(term.to_string()), 1, 20).await.unwrap();
        assert_eq!(page.total, 1, "search {:?}", term);
        assert_eq!(page.items[0].code, "CORD-7");
    }
    let page = affiliates.list(&Some("streams".to_string()), 1, 20).await.unwrap();
    assert_eq!(page.items[0].name, "Budget Streams");
}

// =============================================================================
// Reviews
// =============================================================================

#[tokio::test]
async fn test_customer_reviews_start_pending() {
    let (_dir, storage) = create_storage().await;
    let reviews = ReviewService::new(storage);

    let review = reviews
        .submit(draft(json!({
            "author_name": "Sam",
            "rating": 5,
            "body": "Works great",
            "status": "approved",
            "featured": true,
        })))
        .await
        .unwrap();
    assert_eq!(review.status, ReviewStatus::Pending);
    assert!(!review.featured);

    let approved = reviews.list_approved(None, 1, 20).await.unwrap();
    assert_eq!(approved.total, 0);

    reviews
        .save(
            Some(review.id),
            draft(json!({
                "author_name": "Sam",
                "rating": 5,
                "body": "Works great",
                "status": "approved",
                "featured": true,
            })),
        )
        .await
        .unwrap();
    let approved = reviews.list_approved(None, 1, 20).await.unwrap();
    assert_eq!(approved.total, 1);
    assert!(approved.items[0].featured);
}

#[tokio::test]
async fn test_review_validation() {
    let (_dir, storage) = create_storage().await;
    let reviews = ReviewService::new(storage);

    let bad_rating = reviews
        .submit(draft(json!({ "author_name": "A", "rating": 6, "body": "x" })))
        .await;
    assert!(matches!(bad_rating, Err(StoreError::Validation(_))));

    let unknown_product = reviews
        .submit(draft(json!({ "author_name": "A", "rating": 4, "body": "x", "product_id": 42 })))
        .await;
    assert!(matches!(unknown_product, Err(StoreError::Validation(_))));
}

// =============================================================================
// Seed and stats
// =============================================================================

#[tokio::test]
async fn test_seed_is_idempotent() {
    let (_dir, storage) = create_storage().await;

    let first = seed_demo_data(storage.clone()).await.unwrap();
    assert!(!first.skipped);
    assert!(first.products > 0);

    let second = seed_demo_data(storage.clone()).await.unwrap();
    assert!(second.skipped);

    let stats = storage.dashboard_stats().await.unwrap();
    assert_eq!(stats.products_total, first.products as u64);
    assert_eq!(stats.promotions_total, first.promotions as u64);
}

#[tokio::test]
async fn test_dashboard_stats() {
    let (_dir, storage) = create_storage().await;
    let catalog = CatalogService::new(storage.clone());
    let reviews = ReviewService::new(storage.clone());
    let affiliates = AffiliateService::new(storage.clone());

    catalog
        .save(None, draft(json!({ "name": "A", "price_cents": 100 })))
        .await
        .unwrap();
    catalog
        .save(
            None,
            draft(json!({ "name": "B", "price_cents": 100, "active": false })),
        )
        .await
        .unwrap();
    for rating in [5, 4] {
        reviews
            .save(
                None,
                draft(json!({ "author_name": "R", "rating": rating, "body": "ok", "status": "approved" })),
            )
            .await
            .unwrap();
    }
    let affiliate = affiliates
        .save(None, draft(json!({ "name": "Partner", "commission_bps": 2000 })))
        .await
        .unwrap();
    affiliates.record_sale(affiliate.id, 10_000).await.unwrap();

    let stats = storage.dashboard_stats().await.unwrap();
    assert_eq!(stats.products_total, 2);
    assert_eq!(stats.products_active, 1);
    assert_eq!(stats.reviews_approved, 2);
    assert_eq!(stats.average_rating, Some(4.5));
    assert_eq!(stats.affiliates_active, 1);
    assert_eq!(stats.affiliate_sales_cents, 10_000);
    assert_eq!(stats.affiliate_commission_cents, 2_000);
}
