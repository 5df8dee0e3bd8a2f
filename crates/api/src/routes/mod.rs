//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health              - Liveness check
//! GET    /health/ready        - Readiness check (store connectivity)
//!
//! # Shops
//! GET    /v1/shops            - List shops (public)
//! POST   /v1/shops            - Create shop (admin)
//! GET    /v1/shops/{shopId}   - Get shop (public)
//! PUT    /v1/shops/{shopId}   - Replace shop (admin)
//! PATCH  /v1/shops/{shopId}   - Update shop (admin)
//! DELETE /v1/shops/{shopId}   - Delete shop (admin)
//! ```

pub mod health;
pub mod shops;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::middleware::{make_request_span, request_id_middleware};
use crate::state::AppState;

/// Create the shop routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shops::list).post(shops::create))
        .route(
            "/{shopId}",
            get(shops::show)
                .put(shops::replace)
                .patch(shops::update)
                .delete(shops::remove),
        )
}

/// Build the full application router.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/v1/shops", shop_routes())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .with_state(state)
}
