//! Opening the shop database and bringing its schema up to date

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{debug, info};

use crate::errors::{Result, StoreError};
use migration::{Migrator, MigratorTrait};

/// SQLite 写锁等待上限，超时后由 retry 模块接手
const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);
/// 约 16 MB 页缓存（负数单位为 KiB）
const SQLITE_CACHE_KIB: &str = "-16000";

const POOL_CONNECT_TIMEOUT: Duration = Duration::from_secs(8);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(300);
const POOL_MAX_LIFETIME: Duration = Duration::from_secs(3600);

/// Open a single-file shop database in WAL mode, creating it on first start
pub async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
    use sea_orm::SqlxSqliteConnector;
    use sea_orm::sqlx::SqlitePool;
    use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| {
            StoreError::database_config(format!(
                "Invalid shop database URL {}: {}",
                database_url, e
            ))
        })?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(SQLITE_BUSY_TIMEOUT)
        .pragma("cache_size", SQLITE_CACHE_KIB)
        .pragma("temp_store", "memory");

    let pool = SqlitePool::connect_with(options).await.map_err(|e| {
        StoreError::database_connection(format!("Cannot open shop database: {}", e))
    })?;

    debug!("Shop database opened in WAL mode");
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// Pooled connection for a hosted MySQL or PostgreSQL shop database
pub async fn connect_generic(
    database_url: &str,
    backend_name: &str,
    pool_size: u32,
) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(pool_size)
        .min_connections(pool_size.min(5))
        .connect_timeout(POOL_CONNECT_TIMEOUT)
        .acquire_timeout(POOL_CONNECT_TIMEOUT)
        .idle_timeout(POOL_IDLE_TIMEOUT)
        .max_lifetime(POOL_MAX_LIFETIME)
        .sqlx_logging(false);

    let db = Database::connect(options).await.map_err(|e| {
        StoreError::database_connection(format!(
            "Cannot reach {} shop database: {}",
            backend_name.to_uppercase(),
            e
        ))
    })?;

    debug!("{} pool ready ({} connections max)", backend_name, pool_size);
    Ok(db)
}

/// Create or upgrade the catalog, marketing and content tables
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None).await.map_err(|e| {
        StoreError::database_operation(format!("Shop schema migration failed: {}", e))
    })?;

    info!("Shop schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{EntityTrait, PaginatorTrait};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sqlite_file_created_and_migrated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shop.db");
        let url = format!("sqlite://{}?mode=rwc", path.display());

        let db = connect_sqlite(&url).await.unwrap();
        run_migrations(&db).await.unwrap();
        assert!(path.exists());

        let products = migration::entities::product::Entity::find()
            .count(&db)
            .await
            .unwrap();
        assert_eq!(products, 0);

        // 重复迁移不报错
        run_migrations(&db).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_malformed_sqlite_url() {
        let err = connect_sqlite("sqlite://shop.db?mode=bogus").await.unwrap_err();
        assert!(matches!(err, StoreError::DatabaseConfig(_)));
    }
}
