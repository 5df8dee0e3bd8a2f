//! Schemas for the `/v1/shops` endpoints.

use std::collections::HashMap;

use serde_json::{Map, Value};

use shop_directory_core::ShopId;

use super::reader::{BodyFields, QueryFields, shop_id_param};
use super::{BodySchema, ParamsSchema, QuerySchema, ValidationErrors};
use crate::models::{ShopFilter, ShopInput, ShopPatch};

/// `GET /v1/shops` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListShops(pub ShopFilter);

impl QuerySchema for ListShops {
    fn from_query(query: &HashMap<String, String>) -> Result<Self, ValidationErrors> {
        let defaults = ShopFilter::default();
        let mut fields = QueryFields::new(query);

        let page = fields.integer("page", 1, u32::MAX, defaults.page);
        let per_page = fields.integer("perPage", 1, 100, defaults.per_page);
        let filter = ShopFilter {
            page,
            per_page,
            name: fields.trimmed("name"),
            email: fields.trimmed("email"),
            address: fields.string("address"),
        };

        fields.finish(Self(filter))
    }
}

fn full_input(body: &Map<String, Value>) -> Result<ShopInput, ValidationErrors> {
    let mut fields = BodyFields::new(body);

    let email = fields.email(true);
    let address = fields.address(true);
    let name = fields.name();
    let picture = fields.picture();
    let loc = fields.loc();
    let role = fields.role();

    // A missing required field has already been recorded
    let (Some(email), Some(address)) = (email, address) else {
        return Err(fields.into_errors());
    };

    fields.finish(ShopInput {
        email,
        address,
        name,
        picture,
        loc,
        role,
    })
}

/// `POST /v1/shops` body.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateShop(pub ShopInput);

impl BodySchema for CreateShop {
    fn from_body(body: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        full_input(body).map(Self)
    }
}

/// `PUT /v1/shops/{shopId}` body.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceShop(pub ShopInput);

impl BodySchema for ReplaceShop {
    fn from_body(body: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        full_input(body).map(Self)
    }
}

/// `PATCH /v1/shops/{shopId}` body.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateShop(pub ShopPatch);

impl BodySchema for UpdateShop {
    fn from_body(body: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let mut fields = BodyFields::new(body);

        let patch = ShopPatch {
            email: fields.email(false),
            address: fields.address(false),
            name: fields.name(),
            picture: fields.picture(),
            loc: fields.loc(),
            role: fields.role(),
        };

        fields.finish(Self(patch))
    }
}

/// `{shopId}` path parameter of the replace and update routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopIdParams {
    pub shop_id: ShopId,
}

impl ParamsSchema for ShopIdParams {
    fn from_params(params: &HashMap<String, String>) -> Result<Self, ValidationErrors> {
        shop_id_param(params).map(|shop_id| Self { shop_id })
    }
}
