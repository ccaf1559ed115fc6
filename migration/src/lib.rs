pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20261016_000001_catalog;
mod m20261016_000002_marketing;
mod m20261016_000003_content;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261016_000001_catalog::Migration),
            Box::new(m20261016_000002_marketing::Migration),
            Box::new(m20261016_000003_content::Migration),
        ]
    }
}
