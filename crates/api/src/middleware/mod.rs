//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, start transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (record on span, echo on response)
//!
//! Authorization and the shop resolver run per route as extractors.

pub mod auth;
pub mod request_id;
pub mod shop_param;

pub use auth::{AuthError, RequireAdmin, authenticate, authorize};
pub use request_id::{REQUEST_ID_HEADER, make_request_span, request_id_middleware};
pub use shop_param::LoadedShop;
