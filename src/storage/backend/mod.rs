//! SeaORM storage backend
//!
//! One `SeaOrmStorage` serves every table of the shop. The per-table
//! operations live in their own files; reads and idempotent writes go
//! through [`retry::with_retry`], inserts and counter increments through
//! [`retry::with_retry_non_idempotent`].

mod affiliates;
mod connection;
mod converters;
mod posts;
mod products;
mod promotions;
mod redirects;
pub mod retry;
mod reviews;
mod stats;

use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, DatabaseConnection, ExprTrait};
use tracing::warn;

use crate::errors::{Result, StoreError};
use crate::storage::models::StorageConfig;

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::*;

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(StoreError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 页码从 1 开始，每页 1..=100
pub fn normalize_page(page: Option<u64>, page_size: Option<u64>) -> (u64, u64) {
    (
        std::cmp::Ord::max(page.unwrap_or(1), 1),
        page_size.unwrap_or(20).clamp(1, 100),
    )
}

/// 空白搜索词视为无搜索
pub(crate) fn search_term(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `LOWER(column) LIKE '%term%'`
pub(crate) fn contains_ignore_case<C: ColumnTrait>(column: C, term: &str) -> Expr {
    Expr::expr(Func::lower(Expr::col((column.entity_name(), column))))
        .like(format!("%{}%", term.to_lowercase()))
}

#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(StoreError::database_config("DATABASE_URL 未设置"));
        }

        let (retry_config, pool_size) = match crate::config::try_get_config() {
            Some(config) => (
                retry::RetryConfig::from_config(&config.database),
                config.database.pool_size,
            ),
            None => (retry::RetryConfig::default(), 10),
        };

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name, pool_size).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config,
        };

        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn get_backend_config(&self) -> StorageConfig {
        StorageConfig {
            storage_type: self.backend_name.clone(),
        }
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}
