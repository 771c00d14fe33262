pub mod entity;
mod mapper;
pub mod migrations;
mod sea_orm_repo;

pub use sea_orm_repo::{
    SeaOrmAccessRepository, SeaOrmConflictRepository, SeaOrmGroupRepository,
    SeaOrmResourceRepository,
};

use std::time::Duration;

use entitle_runtime::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Connect to the catalog database and apply pending migrations.
pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.connection_url());
    options
        .max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    migrations::Migrator::up(&db, None).await?;
    Ok(db)
}
