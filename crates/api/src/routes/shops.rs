//! Shop handlers.
//!
//! Authorization, validation, and the `{shopId}` resolver all run as
//! extractors, so a handler body only talks to the store and shapes the
//! response.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::{LoadedShop, RequireAdmin};
use crate::models::{Shop, ShopView};
use crate::state::AppState;
use crate::validation::{
    CreateShop, ListShops, ReplaceShop, ShopIdParams, UpdateShop, ValidBody, ValidParams,
    ValidQuery,
};

/// `GET /v1/shops`
#[instrument(skip_all, fields(page = filter.page, per_page = filter.per_page))]
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(ListShops(filter)): ValidQuery<ListShops>,
) -> Result<Json<Vec<ShopView>>> {
    let shops = state.store().list(&filter).await?;
    Ok(Json(shops.iter().map(Shop::transform).collect()))
}

/// `POST /v1/shops`
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_actor): RequireAdmin,
    ValidBody(CreateShop(input)): ValidBody<CreateShop>,
) -> Result<(StatusCode, Json<ShopView>)> {
    let shop = state.store().insert(input.into_created()).await?;
    Ok((StatusCode::CREATED, Json(shop.transform())))
}

/// `GET /v1/shops/{shopId}`
#[instrument(skip_all, fields(shop_id = %shop_id))]
pub async fn show(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
) -> Result<Json<ShopView>> {
    let shop = state.store().get(&shop_id).await?;
    Ok(Json(shop.transform()))
}

/// `PUT /v1/shops/{shopId}`
///
/// Overwrites every caller-controlled field; omitted optional fields are
/// cleared.
#[instrument(skip_all, fields(shop_id = %shop.id))]
pub async fn replace(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    ValidParams(_params): ValidParams<ShopIdParams>,
    LoadedShop(shop): LoadedShop,
    ValidBody(ReplaceShop(input)): ValidBody<ReplaceShop>,
) -> Result<Json<ShopView>> {
    let document = input.into_replacement(&shop, &actor);
    let saved = state.store().replace(shop.id, document).await?;
    Ok(Json(saved.transform()))
}

/// `PATCH /v1/shops/{shopId}`
#[instrument(skip_all, fields(shop_id = %shop.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    ValidParams(_params): ValidParams<ShopIdParams>,
    LoadedShop(mut shop): LoadedShop,
    ValidBody(UpdateShop(patch)): ValidBody<UpdateShop>,
) -> Result<Json<ShopView>> {
    shop.apply(patch.restricted_for(&actor));
    let saved = state.store().save(&shop).await?;
    Ok(Json(saved.transform()))
}

/// `DELETE /v1/shops/{shopId}`
#[instrument(skip_all, fields(shop_id = %shop.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_actor): RequireAdmin,
    LoadedShop(shop): LoadedShop,
) -> Result<StatusCode> {
    state.store().delete(shop.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
