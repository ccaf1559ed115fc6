//! Demo data for a fresh database

use std::sync::Arc;

use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::info;

use crate::errors::Result;
use crate::pricing::{IptvPlan, iptv_price_cents};
use crate::storage::{
    DiscountType, PostDraft, PostStatus, ProductCategory, ProductDraft, PromotionDraft,
    RedirectDraft, SeaOrmStorage,
};

use super::{BlogService, CatalogService, PromotionService, RedirectService};

#[derive(Debug, Default, Clone, Serialize)]
pub struct SeedReport {
    pub products: usize,
    pub promotions: usize,
    pub posts: usize,
    pub redirects: usize,
    /// True when the catalog already had products and nothing was written
    pub skipped: bool,
}

fn firestick(
    name: &str,
    price_cents: i64,
    badge: Option<&str>,
    features: &[&str],
    sort_order: i32,
) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        price_cents,
        description: format!("{} with Alexa Voice Remote, ready to stream.", name),
        features: features.iter().map(|f| f.to_string()).collect(),
        category: ProductCategory::Firestick,
        badge: badge.map(str::to_string),
        image_url: None,
        active: true,
        sort_order,
    }
}

fn demo_products() -> Result<Vec<ProductDraft>> {
    let mut products = vec![
        firestick(
            "Fire TV Stick HD",
            3999,
            None,
            &["Full HD streaming", "Alexa Voice Remote", "Wi-Fi 5"],
            10,
        ),
        firestick(
            "Fire TV Stick 4K",
            4999,
            Some("Best Seller"),
            &["4K Ultra HD", "Dolby Vision & Atmos", "Wi-Fi 6"],
            20,
        ),
        firestick(
            "Fire TV Stick 4K Max",
            5999,
            Some("New"),
            &["4K Ultra HD", "Ambient TV", "Wi-Fi 6E", "16 GB storage"],
            30,
        ),
    ];

    for (i, plan) in IptvPlan::iter().enumerate() {
        products.push(ProductDraft {
            name: format!("IPTV {} Plan", plan.label()),
            price_cents: iptv_price_cents(plan, 1)?,
            description: format!(
                "{} of live TV, movies and series. Add devices at checkout.",
                plan.label()
            ),
            features: vec![
                "20,000+ live channels".to_string(),
                "VOD library".to_string(),
                "Up to 5 devices".to_string(),
            ],
            category: ProductCategory::Iptv,
            badge: (plan == IptvPlan::OneYear).then(|| "Best Value".to_string()),
            image_url: None,
            active: true,
            sort_order: 100 + i as i32 * 10,
        });
    }

    Ok(products)
}

/// Load the demo catalog unless the database already has products
pub async fn seed_demo_data(storage: Arc<SeaOrmStorage>) -> Result<SeedReport> {
    if storage.count_products().await? > 0 {
        info!("Catalog is not empty, skipping demo data");
        return Ok(SeedReport {
            skipped: true,
            ..Default::default()
        });
    }

    let mut report = SeedReport::default();

    let catalog = CatalogService::new(storage.clone());
    for draft in demo_products()? {
        catalog.save(None, draft).await?;
        report.products += 1;
    }

    let promotions = PromotionService::new(storage.clone());
    promotions
        .save(
            None,
            PromotionDraft {
                code: "WELCOME10".to_string(),
                discount_type: DiscountType::Percentage,
                value: 1000,
                min_purchase_cents: 0,
                max_uses: None,
                starts_at: None,
                ends_at: None,
                active: true,
            },
        )
        .await?;
    report.promotions += 1;

    let blog = BlogService::new(storage.clone());
    blog.save(
        None,
        PostDraft {
            title: "Getting Started with Your Fire TV Stick".to_string(),
            slug: String::new(),
            excerpt: "Plug in, pair the remote and start streaming in minutes.".to_string(),
            content: "Plug the stick into an HDMI port, connect power and follow the on-screen \
                      setup. Pair the remote, join your Wi-Fi network and sign in."
                .to_string(),
            author: "Store Team".to_string(),
            seo_title: None,
            seo_description: None,
            seo_keywords: Some("fire tv stick, setup".to_string()),
            status: PostStatus::Published,
        },
    )
    .await?;
    report.posts += 1;

    let redirects = RedirectService::new(storage);
    redirects
        .save(
            None,
            RedirectDraft {
                from_path: "/shop".to_string(),
                to_path: "/products".to_string(),
                status_code: 301,
                active: true,
            },
        )
        .await?;
    report.redirects += 1;

    info!(
        "Demo data loaded: {} products, {} promotions, {} posts, {} redirects",
        report.products, report.promotions, report.posts, report.redirects
    );
    Ok(report)
}
