//! Core types for the shop directory.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod geo;
pub mod id;
pub mod role;

pub use email::{Email, EmailError};
pub use geo::GeoPoint;
pub use id::{ShopId, ShopIdError};
pub use role::ShopRole;
