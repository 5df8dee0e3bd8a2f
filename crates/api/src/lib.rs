//! Shop directory HTTP API.
//!
//! A single CRUD resource, the shop, served under `/v1/shops`. The binary in
//! `main.rs` wires this library to `PostgreSQL`; tests wire it to
//! [`db::MemoryShopStore`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod validation;
