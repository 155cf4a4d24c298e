//! Database migration command.
//!
//! Applies the migrations embedded from `crates/server/migrations/`.
//! The server never migrates on startup; this command is the only
//! migration path.

use gala_server::db::create_pool;

use super::{CommandError, database_url};

/// Run all pending migrations.
pub async fn run() -> Result<(), CommandError> {
    let url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
