//! Field readers shared by the endpoint schemas.
//!
//! Readers record failures instead of returning early, so one pass reports
//! every bad field.

use std::collections::HashMap;

use serde_json::{Map, Value};

use shop_directory_core::{Email, GeoPoint, ShopId, ShopRole};

use super::{Location, ValidationErrors};
use crate::models::ShopSchema;

/// Reads typed fields out of a JSON body.
pub(super) struct BodyFields<'a> {
    body: &'a Map<String, Value>,
    errors: ValidationErrors,
}

impl<'a> BodyFields<'a> {
    pub(super) fn new(body: &'a Map<String, Value>) -> Self {
        Self {
            body,
            errors: ValidationErrors::default(),
        }
    }

    pub(super) fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        self.errors.finish(value)
    }

    pub(super) fn into_errors(self) -> ValidationErrors {
        self.errors
    }

    fn fail(&mut self, field: &str, message: String) {
        self.errors.push(field, Location::Body, message);
    }

    fn string(&mut self, field: &str, required: bool) -> Option<&'a str> {
        match self.body.get(field) {
            None if required => {
                self.fail(field, format!("\"{field}\" is required"));
                None
            }
            None => None,
            Some(Value::String(s)) if s.is_empty() => {
                self.fail(field, format!("\"{field}\" is not allowed to be empty"));
                None
            }
            Some(Value::String(s)) => Some(s.as_str()),
            Some(_) => {
                self.fail(field, format!("\"{field}\" must be a string"));
                None
            }
        }
    }

    pub(super) fn email(&mut self, required: bool) -> Option<Email> {
        let raw = self.string("email", required)?;
        if !is_email_syntax(raw.trim()) {
            self.fail("email", "\"email\" must be a valid email".to_string());
            return None;
        }
        match Email::parse(raw) {
            Ok(email) => Some(email),
            Err(e) => {
                self.fail(
                    "email",
                    format!("\"email\" must be a valid email ({e})"),
                );
                None
            }
        }
    }

    pub(super) fn address(&mut self, required: bool) -> Option<String> {
        let raw = self.string("address", required)?;
        let len = raw.chars().count();
        if len < ShopSchema::ADDRESS_MIN_LENGTH {
            self.fail(
                "address",
                format!(
                    "\"address\" length must be at least {} characters long",
                    ShopSchema::ADDRESS_MIN_LENGTH
                ),
            );
            return None;
        }
        if len > ShopSchema::ADDRESS_MAX_LENGTH {
            self.fail(
                "address",
                format!(
                    "\"address\" length must be less than or equal to {} characters long",
                    ShopSchema::ADDRESS_MAX_LENGTH
                ),
            );
            return None;
        }
        Some(raw.to_string())
    }

    /// Trimmed name.
    pub(super) fn name(&mut self) -> Option<String> {
        let trimmed = self.trimmed("name")?;
        if trimmed.chars().count() > ShopSchema::NAME_MAX_LENGTH {
            self.fail(
                "name",
                format!(
                    "\"name\" length must be less than or equal to {} characters long",
                    ShopSchema::NAME_MAX_LENGTH
                ),
            );
            return None;
        }
        Some(trimmed.to_string())
    }

    /// Trimmed picture URL.
    pub(super) fn picture(&mut self) -> Option<String> {
        self.trimmed("picture").map(str::to_string)
    }

    /// Optional string with surrounding whitespace removed. Whitespace-only
    /// input is reported as empty.
    fn trimmed(&mut self, field: &str) -> Option<&'a str> {
        let trimmed = self.string(field, false)?.trim();
        if trimmed.is_empty() {
            self.fail(field, format!("\"{field}\" is not allowed to be empty"));
            return None;
        }
        Some(trimmed)
    }

    /// `[longitude, latitude]` pair.
    pub(super) fn loc(&mut self) -> Option<GeoPoint> {
        let value = self.body.get("loc")?;
        let pair = match value.as_array().map(Vec::as_slice) {
            Some([lng, lat]) => lng.as_f64().zip(lat.as_f64()),
            _ => None,
        };

        match pair.map(|(lng, lat)| GeoPoint::new(lng, lat)) {
            Some(point) if point.is_finite() => Some(point),
            _ => {
                self.fail(
                    "loc",
                    "\"loc\" must be an array of two numbers [longitude, latitude]".to_string(),
                );
                None
            }
        }
    }

    pub(super) fn role(&mut self) -> Option<ShopRole> {
        let raw = self.string("role", false)?;
        if let Ok(role) = raw.parse::<ShopRole>() {
            Some(role)
        } else {
            self.fail("role", "\"role\" must be one of [user, admin]".to_string());
            None
        }
    }
}

/// One `@`, a non-empty local part, and a dotted domain with no empty labels.
fn is_email_syntax(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// Reads typed fields out of a decoded query string.
pub(super) struct QueryFields<'a> {
    query: &'a HashMap<String, String>,
    errors: ValidationErrors,
}

impl<'a> QueryFields<'a> {
    pub(super) fn new(query: &'a HashMap<String, String>) -> Self {
        Self {
            query,
            errors: ValidationErrors::default(),
        }
    }

    pub(super) fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        self.errors.finish(value)
    }

    /// Filter value, verbatim. An empty value is an error, never a filter.
    pub(super) fn string(&mut self, field: &str) -> Option<String> {
        let raw = self.query.get(field)?;
        if raw.is_empty() {
            self.empty(field);
            return None;
        }
        Some(raw.clone())
    }

    /// Filter value with surrounding whitespace removed.
    pub(super) fn trimmed(&mut self, field: &str) -> Option<String> {
        let raw = self.query.get(field)?.trim();
        if raw.is_empty() {
            self.empty(field);
            return None;
        }
        Some(raw.to_string())
    }

    fn empty(&mut self, field: &str) {
        self.errors.push(
            field,
            Location::Query,
            format!("\"{field}\" is not allowed to be empty"),
        );
    }

    /// Integer in `min..=max`, `default` when absent.
    pub(super) fn integer(&mut self, field: &str, min: u32, max: u32, default: u32) -> u32 {
        let Some(raw) = self.query.get(field) else {
            return default;
        };

        let Ok(value) = raw.trim().parse::<i64>() else {
            self.errors.push(
                field,
                Location::Query,
                format!("\"{field}\" must be an integer"),
            );
            return default;
        };

        if value < i64::from(min) {
            self.errors.push(
                field,
                Location::Query,
                format!("\"{field}\" must be greater than or equal to {min}"),
            );
            return default;
        }
        if value > i64::from(max) {
            self.errors.push(
                field,
                Location::Query,
                format!("\"{field}\" must be less than or equal to {max}"),
            );
            return default;
        }

        u32::try_from(value).unwrap_or(default)
    }
}

/// Read the `shopId` path parameter.
pub(super) fn shop_id_param(
    params: &HashMap<String, String>,
) -> Result<ShopId, ValidationErrors> {
    let Some(raw) = params.get("shopId") else {
        return Err(ValidationErrors::single(
            "shopId",
            Location::Params,
            "\"shopId\" is required",
        ));
    };

    ShopId::parse(raw).map_err(|_| {
        ValidationErrors::single(
            "shopId",
            Location::Params,
            format!(
                "\"shopId\" with value \"{raw}\" fails to match the required pattern: /^[a-fA-F0-9]{{24}}$/"
            ),
        )
    })
}
