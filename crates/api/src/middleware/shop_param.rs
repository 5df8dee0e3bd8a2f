//! `{shopId}` route-parameter resolver.

use std::collections::HashMap;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;
use crate::models::Shop;
use crate::state::AppState;

/// The shop named by the `{shopId}` path segment, loaded before the handler
/// runs.
///
/// Rejects with `NotFound` when the id is malformed or no shop has it, so
/// handlers never re-check.
pub struct LoadedShop(pub Shop);

impl FromRequestParts<AppState> for LoadedShop {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;
        let raw = params.get("shopId").ok_or(AppError::NotFound)?;

        let shop = state.store().get(raw).await?;
        Ok(Self(shop))
    }
}
