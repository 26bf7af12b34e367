pub use sea_orm_migration::prelude::*;

mod m20211122_000000_create_identity;
mod m20211122_000001_create_catalog;
mod m20211122_000002_seed_catalog;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20211122_000000_create_identity::Migration),
            Box::new(m20211122_000001_create_catalog::Migration),
            Box::new(m20211122_000002_seed_catalog::Migration),
        ]
    }
}
