//! Data access for shops.
//!
//! # Database: `shop_directory`
//!
//! ## Tables
//!
//! - `shops` - Shop records (email unique, address/name length CHECKs)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p shop-directory-cli -- migrate
//! ```
//!
//! Handlers reach storage only through [`ShopStore`]. [`PgShopStore`] is the
//! production implementation; [`MemoryShopStore`] backs the router tests.

mod memory;
mod shops;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use shop_directory_core::ShopId;

use crate::models::{SchemaViolation, Shop, ShopDocument, ShopFilter};

pub use memory::MemoryShopStore;
pub use shops::PgShopStore;

/// Message carried by [`RepositoryError::Conflict`] for a duplicate email.
pub const DUPLICATE_EMAIL: &str = "\"email\" already exists";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is invalid or corrupted.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Record not found.
    #[error("not found")]
    NotFound,

    /// Conflict (e.g., duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Record violates the shop definition.
    #[error("invalid shop: {0}")]
    Invalid(#[from] SchemaViolation),
}

/// Storage for shop records.
#[async_trait]
pub trait ShopStore: Send + Sync {
    /// Fetch a shop by id, `None` if absent.
    async fn find_by_id(&self, id: ShopId) -> Result<Option<Shop>, RepositoryError>;

    /// Fetch a shop by its raw path id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if `id` is not a valid shop id or
    /// no shop has it.
    async fn get(&self, id: &str) -> Result<Shop, RepositoryError> {
        let Ok(id) = ShopId::parse(id) else {
            return Err(RepositoryError::NotFound);
        };
        self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// List shops matching `filter`, newest first.
    async fn list(&self, filter: &ShopFilter) -> Result<Vec<Shop>, RepositoryError>;

    /// Persist a new shop.
    ///
    /// Returns `RepositoryError::Conflict` if the email is taken.
    async fn insert(&self, document: ShopDocument) -> Result<Shop, RepositoryError>;

    /// Persist every field of an existing shop and refresh `updated_at`.
    ///
    /// Returns `RepositoryError::Conflict` if the email is taken and
    /// `RepositoryError::NotFound` if the shop no longer exists.
    async fn save(&self, shop: &Shop) -> Result<Shop, RepositoryError>;

    /// Overwrite the shop with `id`, creating it when absent.
    async fn replace(&self, id: ShopId, document: ShopDocument) -> Result<Shop, RepositoryError>;

    /// Hard-delete a shop. Deleting an absent id is not an error.
    async fn delete(&self, id: ShopId) -> Result<(), RepositoryError>;

    /// Check store connectivity.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(2.min(max_connections))
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
