//! Validating extractors.
//!
//! Each extractor rejects with [`AppError::Validation`], so a bad request never
//! reaches the handler.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde_json::{Map, Value};

use super::{BodySchema, Location, ParamsSchema, QuerySchema, ValidationErrors};
use crate::error::AppError;

/// Query string validated by `T`.
///
/// # Example
///
/// ```rust,ignore
/// async fn list(ValidQuery(ListShops(filter)): ValidQuery<ListShops>) { /* ... */ }
/// ```
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: QuerySchema,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                ValidationErrors::single("query", Location::Query, e.body_text())
            })?;

        Ok(Self(T::from_query(&query)?))
    }
}

/// Path parameters validated by `T`.
pub struct ValidParams<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidParams<T>
where
    S: Send + Sync,
    T: ParamsSchema,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                ValidationErrors::single("params", Location::Params, e.body_text())
            })?;

        Ok(Self(T::from_params(&params)?))
    }
}

/// JSON body validated by `T`.
///
/// Consumes the request body, so it must be the last handler argument. An
/// empty body reads as `{}`.
pub struct ValidBody<T>(pub T);

impl<S, T> FromRequest<S> for ValidBody<T>
where
    S: Send + Sync,
    T: BodySchema,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ValidationErrors::single("body", Location::Body, e.body_text()))?;

        let body = parse_object(&bytes)?;
        Ok(Self(T::from_body(&body)?))
    }
}

fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>, ValidationErrors> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ValidationErrors::single(
            "body",
            Location::Body,
            "\"body\" must be a JSON object",
        )),
        Err(e) => Err(ValidationErrors::single(
            "body",
            Location::Body,
            format!("malformed JSON: {e}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_reads_as_empty_object() {
        assert_eq!(parse_object(b""), Ok(Map::new()));
        assert_eq!(parse_object(b"  \n"), Ok(Map::new()));
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        let errors = parse_object(b"[1, 2]").unwrap_err();
        assert_eq!(errors.errors()[0].field, "body");
        assert!(parse_object(b"{\"email\":").is_err());
    }
}
