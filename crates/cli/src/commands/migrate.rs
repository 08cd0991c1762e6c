//! Session schema migration.
//!
//! # Usage
//!
//! ```bash
//! ventaro migrate
//! ```
//!
//! # Environment Variables
//!
//! - `SITE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use thiserror::Error;
use ventaro_storefront::config::{ConfigError, database_url_from_env};
use ventaro_storefront::db;
use ventaro_storefront::middleware::postgres_store;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create the `tower_sessions` schema and session table if missing.
///
/// Safe to run repeatedly.
///
/// # Errors
///
/// Returns an error if the database URL is missing or the DDL fails.
pub async fn sessions() -> Result<(), MigrationError> {
    let database_url = database_url_from_env()?;

    tracing::info!("Connecting to site database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Creating session store schema...");
    postgres_store(&pool).migrate().await?;

    tracing::info!("Session store ready");
    Ok(())
}
