//! `shopctl` subcommands.

pub mod migrate;
pub mod shop;

use secrecy::SecretString;

/// Read the database URL the API server uses.
///
/// Loads `.env` first. `SHOP_API_DATABASE_URL` wins over `DATABASE_URL`.
pub(crate) fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();

    ["SHOP_API_DATABASE_URL", "DATABASE_URL"]
        .into_iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .map(SecretString::from)
}
