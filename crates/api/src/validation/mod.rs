//! Request validation.
//!
//! Each endpoint has a schema type that turns one part of the request (query
//! string, JSON body, or path parameters) into typed input. Schemas collect
//! every failing field before returning, so a client sees all problems in one
//! response.
//!
//! Handlers receive validated input through the [`ValidQuery`], [`ValidBody`]
//! and [`ValidParams`] extractors.

mod extract;
mod reader;
mod shops;

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

pub use extract::{ValidBody, ValidParams, ValidQuery};
pub use shops::{CreateShop, ListShops, ReplaceShop, ShopIdParams, UpdateShop};

/// Where in the request a field was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Query,
    Body,
    Params,
}

/// Every message for one offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub location: Location,
    pub messages: Vec<String>,
}

/// The collected failures of one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// A single failure.
    #[must_use]
    pub fn single(field: &str, location: Location, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, location, message);
        errors
    }

    /// Record `message` against `field`, grouping messages per field.
    pub fn push(&mut self, field: &str, location: Location, message: impl Into<String>) {
        let message = message.into();
        if let Some(existing) = self
            .errors
            .iter_mut()
            .find(|e| e.field == field && e.location == location)
        {
            existing.messages.push(message);
            return;
        }
        self.errors.push(FieldError {
            field: field.to_string(),
            location,
            messages: vec![message],
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// `Ok(value)` if nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field failed.
    pub fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Rules for the query string of an endpoint.
pub trait QuerySchema: Sized {
    /// Validate the decoded query parameters.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    fn from_query(query: &HashMap<String, String>) -> Result<Self, ValidationErrors>;
}

/// Rules for the JSON body of an endpoint.
pub trait BodySchema: Sized {
    /// Validate the top-level JSON object.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    fn from_body(body: &Map<String, Value>) -> Result<Self, ValidationErrors>;
}

/// Rules for the path parameters of an endpoint.
pub trait ParamsSchema: Sized {
    /// Validate the captured path parameters.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    fn from_params(params: &HashMap<String, String>) -> Result<Self, ValidationErrors>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_groups_messages_by_field() {
        let mut errors = ValidationErrors::default();
        errors.push("email", Location::Body, "first");
        errors.push("email", Location::Body, "second");
        errors.push("email", Location::Query, "third");

        assert_eq!(errors.errors().len(), 2);
        assert_eq!(errors.errors()[0].messages, vec!["first", "second"]);
    }

    #[test]
    fn test_finish() {
        assert_eq!(ValidationErrors::default().finish(7), Ok(7));
        assert!(
            ValidationErrors::single("page", Location::Query, "bad")
                .finish(7)
                .is_err()
        );
    }

    #[test]
    fn test_serialized_shape() {
        let errors = ValidationErrors::single("shopId", Location::Params, "bad id");
        let json = serde_json::to_value(errors.errors()).unwrap_or_default();
        assert_eq!(
            json,
            serde_json::json!([{
                "field": "shopId",
                "location": "params",
                "messages": ["bad id"],
            }])
        );
    }
}
