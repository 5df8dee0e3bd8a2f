//! Domain models for the API.
//!
//! These types represent validated domain objects separate from database row types.

pub mod principal;
pub mod shop;

pub use principal::{Principal, Role};
pub use shop::{
    SchemaViolation, Shop, ShopDocument, ShopFilter, ShopInput, ShopPatch, ShopSchema, ShopView,
};
