//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! shopctl migrate
//! ```
//!
//! # Environment Variables
//!
//! - `SHOP_API_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! `crates/api/migrations/`, embedded at compile time by `sqlx::migrate!`.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run every pending migration against the shop directory database.
///
/// # Errors
///
/// Returns `MigrationError` if the URL is unset, the connection fails, or a
/// migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    let database_url =
        super::database_url().ok_or(MigrationError::MissingEnvVar("SHOP_API_DATABASE_URL"))?;

    tracing::info!("Connecting to shop directory database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
