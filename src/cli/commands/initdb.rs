use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing::{debug, error, info};

pub async fn init_database(database_url: &str) -> Result<()> {
    info!("Initializing rent ledger database");
    debug!("Database URL: {}", database_url);

    let db = match Database::connect(database_url).await {
        Ok(connection) => connection,
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e.into());
        }
    };
    debug!("Database connection established");

    info!("Applying migrations");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Migration failed: {}", e);
        return Err(e.into());
    }

    info!("Rent ledger schema is up to date");
    Ok(())
}
