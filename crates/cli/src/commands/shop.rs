//! Shop management commands.
//!
//! # Usage
//!
//! ```bash
//! shopctl shop create -e owner@example.com -a "123 Main St" -n "Corner Store"
//! shopctl shop create -e hq@example.com -a "1 Market Sq" -r admin --lng -73.97 --lat 40.77
//! ```
//!
//! Writes go through the same store the API uses, so the email and length
//! rules apply here too.

use std::sync::Arc;

use thiserror::Error;

use shop_directory_api::db::{self, PgShopStore, RepositoryError, ShopStore};
use shop_directory_api::models::{ShopDocument, ShopSchema};
use shop_directory_core::{Email, EmailError, GeoPoint, ShopId, ShopRole};

/// Errors that can occur during shop operations.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: user, admin")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Store rejected the shop.
    #[error("{0}")]
    Store(#[from] RepositoryError),
}

/// Fields for a new shop, as given on the command line.
pub struct NewShop {
    pub email: String,
    pub address: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub role: String,
    pub loc: Option<(f64, f64)>,
}

impl NewShop {
    fn into_document(self) -> Result<ShopDocument, ShopError> {
        let role: ShopRole = self
            .role
            .parse()
            .map_err(|_| ShopError::InvalidRole(self.role.clone()))?;

        Ok(ShopDocument {
            email: Email::parse(&self.email)?,
            address: self.address,
            name: self.name.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty()),
            picture: self.picture.map(|p| p.trim().to_owned()).filter(|p| !p.is_empty()),
            loc: self.loc.map(|(lng, lat)| GeoPoint::new(lng, lat)),
            role,
        })
    }
}

/// Create a shop.
///
/// # Returns
///
/// The id of the created shop.
///
/// # Errors
///
/// Returns `ShopError` if the input is invalid, the email is taken, or the
/// database is unreachable.
pub async fn create(shop: NewShop) -> Result<ShopId, ShopError> {
    let document = shop.into_document()?;

    let database_url =
        super::database_url().ok_or(ShopError::MissingEnvVar("SHOP_API_DATABASE_URL"))?;

    tracing::info!("Connecting to shop directory database...");
    let pool = db::create_pool(&database_url, 2).await?;
    let store = PgShopStore::new(pool, Arc::new(ShopSchema::default()));

    tracing::info!("Creating shop: {} ({})", document.email, document.role);
    let created = store.insert(document).await?;

    tracing::info!(
        "Shop created successfully! ID: {}, Email: {}",
        created.id,
        created.email
    );
    Ok(created.id)
}
