use actix_web::web;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::services::AppStartTime;
use crate::services::{
    AffiliateService, BlogService, CatalogService, PromotionService, RedirectService,
    ReviewService,
};
use crate::storage::{SeaOrmStorage, StorageFactory};

/// Everything the HTTP handlers pull out of app data
#[derive(Clone)]
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub catalog: Arc<CatalogService>,
    pub promotions: Arc<PromotionService>,
    pub redirects: Arc<RedirectService>,
    pub blog: Arc<BlogService>,
    pub affiliates: Arc<AffiliateService>,
    pub reviews: Arc<ReviewService>,
    pub app_start_time: AppStartTime,
}

impl StartupContext {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(storage.clone())),
            promotions: Arc::new(PromotionService::new(storage.clone())),
            redirects: Arc::new(RedirectService::new(storage.clone())),
            blog: Arc::new(BlogService::new(storage.clone())),
            affiliates: Arc::new(AffiliateService::new(storage.clone())),
            reviews: Arc::new(ReviewService::new(storage.clone())),
            app_start_time: AppStartTime {
                start_datetime: chrono::Utc::now(),
            },
            storage,
        }
    }

    /// Register storage and services as app data
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.storage.clone()))
            .app_data(web::Data::from(self.catalog.clone()))
            .app_data(web::Data::from(self.promotions.clone()))
            .app_data(web::Data::from(self.redirects.clone()))
            .app_data(web::Data::from(self.blog.clone()))
            .app_data(web::Data::from(self.affiliates.clone()))
            .app_data(web::Data::from(self.reviews.clone()))
            .app_data(web::Data::new(self.app_start_time.clone()));
    }
}

/// 准备服务器启动的上下文：存储连接、迁移、业务服务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = crate::config::get_config();

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    if config.api.admin_enabled() {
        info!(
            "Admin API available at: {}/v1",
            config.routes.admin_prefix
        );
        if !crate::utils::password::is_argon2_hash(&config.api.admin_password) {
            warn!(
                "api.admin_password is stored in plaintext. \
                 Use `storefront hash-password` to generate an Argon2 hash."
            );
        }
    } else {
        warn!("Admin API is disabled (api.admin_password not set)");
    }

    let context = StartupContext::new(storage);
    debug!("Pre-startup completed in {:?}", start_time.elapsed());
    Ok(context)
}
