//! Shop Directory Core - Shared types library.
//!
//! This crate provides the domain types used across all shop directory components:
//! - `api` - The HTTP service exposing the `/v1/shops` resource
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no database access, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for shop ids, emails, roles, and coordinates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
