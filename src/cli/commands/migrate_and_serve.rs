use anyhow::Result;
use tracing::info;

use crate::cli::commands::initdb::init_database;
use crate::cli::commands::serve::serve;

/// Bring the schema up to date, then start serving. Convenience for
/// deployments where a separate migration step is awkward.
pub async fn migrate_and_serve(database_url: &str, bind_address: &str) -> Result<()> {
    info!("Applying migrations before starting the server");
    init_database(database_url).await?;
    serve(database_url, bind_address).await
}
