use eyre::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.sqlx_logging(false); // Disable SQLx log

    // Every pooled connection to `sqlite::memory:` would open its own empty database.
    if database_url.contains(":memory:") {
        opt.max_connections(1).min_connections(1);
    }

    Database::connect(opt).await
}

/// Applies every pending migration.
pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None).await?;
    info!("Database migrations applied");
    Ok(())
}
