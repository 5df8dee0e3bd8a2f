//! Shop domain types.
//!
//! [`Shop`] is the stored record. [`ShopDocument`] is the set of
//! caller-controlled fields that a create writes and a replace overwrites.
//! [`ShopPatch`] carries the fields a partial update may touch. [`ShopView`] is the
//! projection returned to API clients.

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use shop_directory_core::{Email, GeoPoint, ShopId, ShopRole};

use super::Principal;

/// A shop record.
#[derive(Debug, Clone, PartialEq)]
pub struct Shop {
    /// System-generated, immutable id.
    pub id: ShopId,
    /// Unique, normalized contact email.
    pub email: Email,
    /// Street address.
    pub address: String,
    /// Display name.
    pub name: Option<String>,
    /// Picture URL.
    pub picture: Option<String>,
    /// Location used for proximity queries.
    pub loc: Option<GeoPoint>,
    /// Privileged role. Never exposed to clients.
    pub role: ShopRole,
    /// When the shop was created.
    pub created_at: DateTime<Utc>,
    /// When the shop was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Caller-controlled fields of a shop.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopDocument {
    pub email: Email,
    pub address: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub loc: Option<GeoPoint>,
    pub role: ShopRole,
}

/// A validated create/replace body.
///
/// Unlike [`ShopDocument`], `role` stays optional so a replace can tell an
/// omitted role from an explicit one.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopInput {
    pub email: Email,
    pub address: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub loc: Option<GeoPoint>,
    pub role: Option<ShopRole>,
}

/// A validated partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopPatch {
    pub email: Option<Email>,
    pub address: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub loc: Option<GeoPoint>,
    pub role: Option<ShopRole>,
}

/// Client-facing projection of a shop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopView {
    pub id: ShopId,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub loc: Option<GeoPoint>,
}

/// Filter and pagination for listing shops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopFilter {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl Default for ShopFilter {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 100,
            name: None,
            email: None,
            address: None,
        }
    }
}

impl ShopFilter {
    /// Number of records to skip: `per_page * (page - 1)`.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.per_page) * u64::from(self.page.saturating_sub(1))
    }

    /// The email filter, normalized the way stored emails are.
    #[must_use]
    pub fn email_key(&self) -> Option<String> {
        self.email.as_deref().map(|email| email.trim().to_lowercase())
    }

    /// Whether `shop` passes the equality filter.
    #[must_use]
    pub fn matches(&self, shop: &Shop) -> bool {
        self.name
            .as_deref()
            .is_none_or(|name| shop.name.as_deref() == Some(name))
            && self
                .email_key()
                .is_none_or(|email| shop.email.as_str() == email)
            && self
                .address
                .as_deref()
                .is_none_or(|address| shop.address == address)
    }
}

impl Shop {
    /// Build a freshly created record.
    #[must_use]
    pub fn new(id: ShopId, document: ShopDocument, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: document.email,
            address: document.address,
            name: document.name,
            picture: document.picture,
            loc: document.loc,
            role: document.role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every caller-controlled field, keeping id and `created_at`.
    pub fn overwrite(&mut self, document: ShopDocument, now: DateTime<Utc>) {
        self.email = document.email;
        self.address = document.address;
        self.name = document.name;
        self.picture = document.picture;
        self.loc = document.loc;
        self.role = document.role;
        self.updated_at = now;
    }

    /// Merge a partial update. Only fields present in `patch` change.
    pub fn apply(&mut self, patch: ShopPatch) {
        let ShopPatch {
            email,
            address,
            name,
            picture,
            loc,
            role,
        } = patch;

        if let Some(email) = email {
            self.email = email;
        }
        if let Some(address) = address {
            self.address = address;
        }
        if let Some(name) = name {
            self.name = Some(name);
        }
        if let Some(picture) = picture {
            self.picture = Some(picture);
        }
        if let Some(loc) = loc {
            self.loc = Some(loc);
        }
        if let Some(role) = role {
            self.role = role;
        }
    }

    /// The client-facing projection.
    #[must_use]
    pub fn transform(&self) -> ShopView {
        ShopView {
            id: self.id,
            email: self.email.clone(),
            picture: self.picture.clone(),
            address: self.address.clone(),
            created_at: self.created_at,
            loc: self.loc,
        }
    }
}

impl ShopInput {
    /// The document a create writes. Create is admin-gated upstream, so the
    /// role is taken as given.
    #[must_use]
    pub fn into_created(self) -> ShopDocument {
        ShopDocument {
            email: self.email,
            address: self.address,
            name: self.name,
            picture: self.picture,
            loc: self.loc,
            role: self.role.unwrap_or_default(),
        }
    }

    /// The document a replace writes over `existing`.
    ///
    /// A non-admin actor cannot change the role: the stored value is kept.
    /// An admin's replace is a full overwrite, so an omitted role resets to
    /// the default.
    #[must_use]
    pub fn into_replacement(self, existing: &Shop, actor: &Principal) -> ShopDocument {
        let role = if actor.is_admin() {
            self.role.unwrap_or_default()
        } else {
            existing.role
        };

        ShopDocument {
            email: self.email,
            address: self.address,
            name: self.name,
            picture: self.picture,
            loc: self.loc,
            role,
        }
    }
}

impl ShopPatch {
    /// Drop the role from the patch unless `actor` is an admin.
    #[must_use]
    pub fn restricted_for(mut self, actor: &Principal) -> Self {
        if !actor.is_admin() {
            self.role = None;
        }
        self
    }
}

// =============================================================================
// Record definition
// =============================================================================

/// A stored field is outside the record definition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaViolation {
    #[error("address must be between {min} and {max} characters (got {actual})")]
    AddressLength {
        min: usize,
        max: usize,
        actual: usize,
    },
    #[error("name must be at most {max} characters (got {actual})")]
    NameTooLong { max: usize, actual: usize },
    #[error("loc must contain finite coordinates")]
    InvalidLocation,
}

impl SchemaViolation {
    /// Name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::AddressLength { .. } => "address",
            Self::NameTooLong { .. } => "name",
            Self::InvalidLocation => "loc",
        }
    }
}

/// Field constraints every persisted shop satisfies.
///
/// Built once at startup and shared by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopSchema {
    pub address_length: RangeInclusive<usize>,
    pub name_max_length: usize,
}

impl Default for ShopSchema {
    fn default() -> Self {
        Self {
            address_length: Self::ADDRESS_MIN_LENGTH..=Self::ADDRESS_MAX_LENGTH,
            name_max_length: Self::NAME_MAX_LENGTH,
        }
    }
}

impl ShopSchema {
    pub const ADDRESS_MIN_LENGTH: usize = 6;
    pub const ADDRESS_MAX_LENGTH: usize = 128;
    pub const NAME_MAX_LENGTH: usize = 128;

    /// Check a document before it is written.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn check_document(&self, document: &ShopDocument) -> Result<(), SchemaViolation> {
        self.check_fields(
            &document.address,
            document.name.as_deref(),
            document.loc.as_ref(),
        )
    }

    /// Check a full record before it is saved.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn check_shop(&self, shop: &Shop) -> Result<(), SchemaViolation> {
        self.check_fields(&shop.address, shop.name.as_deref(), shop.loc.as_ref())
    }

    fn check_fields(
        &self,
        address: &str,
        name: Option<&str>,
        loc: Option<&GeoPoint>,
    ) -> Result<(), SchemaViolation> {
        let address_len = address.chars().count();
        if !self.address_length.contains(&address_len) {
            return Err(SchemaViolation::AddressLength {
                min: *self.address_length.start(),
                max: *self.address_length.end(),
                actual: address_len,
            });
        }

        if let Some(name) = name {
            let name_len = name.chars().count();
            if name_len > self.name_max_length {
                return Err(SchemaViolation::NameTooLong {
                    max: self.name_max_length,
                    actual: name_len,
                });
            }
        }

        if loc.is_some_and(|point| !point.is_finite()) {
            return Err(SchemaViolation::InvalidLocation);
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn sample_shop() -> Shop {
        Shop::new(
            ShopId::generate(),
            ShopDocument {
                email: Email::parse("owner@example.com").unwrap(),
                address: "123 Main St".to_string(),
                name: Some("Corner Store".to_string()),
                picture: Some("https://img.example.com/1.png".to_string()),
                loc: Some(GeoPoint::new(-73.97, 40.77)),
                role: ShopRole::Admin,
            },
            Utc::now(),
        )
    }

    fn input(role: Option<ShopRole>) -> ShopInput {
        ShopInput {
            email: Email::parse("new@example.com").unwrap(),
            address: "456 Side Ave".to_string(),
            name: None,
            picture: None,
            loc: None,
            role,
        }
    }

    #[test]
    fn test_transform_projects_public_fields() {
        let shop = sample_shop();
        let json = serde_json::to_value(shop.transform()).unwrap();
        let obj = json.as_object().unwrap();

        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["address", "createdAt", "email", "id", "loc", "picture"]
        );
        assert_eq!(obj["loc"], serde_json::json!([-73.97, 40.77]));
    }

    #[test]
    fn test_transform_omits_unset_picture_and_nulls_loc() {
        let mut shop = sample_shop();
        shop.picture = None;
        shop.loc = None;
        let json = serde_json::to_value(shop.transform()).unwrap();

        assert!(json.get("picture").is_none());
        assert!(json["loc"].is_null());
        assert!(json.get("name").is_none());
        assert!(json.get("role").is_none());
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn test_apply_changes_only_provided_fields() {
        let mut shop = sample_shop();
        let before = shop.clone();

        shop.apply(ShopPatch {
            name: Some("X".to_string()),
            ..ShopPatch::default()
        });

        assert_eq!(shop.name.as_deref(), Some("X"));
        assert_eq!(shop.email, before.email);
        assert_eq!(shop.address, before.address);
        assert_eq!(shop.picture, before.picture);
        assert_eq!(shop.loc, before.loc);
        assert_eq!(shop.role, before.role);
    }

    #[test]
    fn test_overwrite_clears_omitted_fields_and_keeps_identity() {
        let mut shop = sample_shop();
        let before = shop.clone();
        let later = before.created_at + chrono::Duration::seconds(5);

        shop.overwrite(input(None).into_created(), later);

        assert_eq!(shop.id, before.id);
        assert_eq!(shop.created_at, before.created_at);
        assert_eq!(shop.updated_at, later);
        assert_eq!(shop.name, None);
        assert_eq!(shop.picture, None);
        assert_eq!(shop.loc, None);
        assert_eq!(shop.email.as_str(), "new@example.com");
    }

    #[test]
    fn test_patch_role_dropped_for_non_admin() {
        let patch = ShopPatch {
            role: Some(ShopRole::Admin),
            name: Some("Renamed".to_string()),
            ..ShopPatch::default()
        };

        let restricted = patch.clone().restricted_for(&Principal::new(Role::LoggedUser));
        assert_eq!(restricted.role, None);
        assert_eq!(restricted.name.as_deref(), Some("Renamed"));

        let allowed = patch.restricted_for(&Principal::new(Role::Admin));
        assert_eq!(allowed.role, Some(ShopRole::Admin));
    }

    #[test]
    fn test_replacement_keeps_role_for_non_admin() {
        let mut existing = sample_shop();
        existing.role = ShopRole::User;

        let doc = input(Some(ShopRole::Admin))
            .into_replacement(&existing, &Principal::new(Role::LoggedUser));
        assert_eq!(doc.role, ShopRole::User);
    }

    #[test]
    fn test_replacement_by_admin_overwrites_role() {
        let existing = sample_shop();
        let admin = Principal::new(Role::Admin);

        let promoted = input(Some(ShopRole::Admin)).into_replacement(&existing, &admin);
        assert_eq!(promoted.role, ShopRole::Admin);

        let reset = input(None).into_replacement(&existing, &admin);
        assert_eq!(reset.role, ShopRole::User);
    }

    #[test]
    fn test_filter_offset() {
        let filter = ShopFilter {
            page: 2,
            per_page: 10,
            ..ShopFilter::default()
        };
        assert_eq!(filter.offset(), 10);
        assert_eq!(ShopFilter::default().offset(), 0);
    }

    #[test]
    fn test_filter_matches_only_present_fields() {
        let shop = sample_shop();
        assert!(ShopFilter::default().matches(&shop));

        let by_email = ShopFilter {
            email: Some(" Owner@Example.com".to_string()),
            ..ShopFilter::default()
        };
        assert!(by_email.matches(&shop));

        let by_name = ShopFilter {
            name: Some("Other".to_string()),
            ..ShopFilter::default()
        };
        assert!(!by_name.matches(&shop));
    }

    #[test]
    fn test_schema_bounds() {
        let schema = ShopSchema::default();
        let mut shop = sample_shop();
        assert!(schema.check_shop(&shop).is_ok());

        shop.address = "short".to_string();
        assert!(matches!(
            schema.check_shop(&shop),
            Err(SchemaViolation::AddressLength { actual: 5, .. })
        ));

        shop.address = "a".repeat(129);
        assert!(schema.check_shop(&shop).is_err());

        shop.address = "a".repeat(128);
        shop.name = Some("n".repeat(129));
        let err = schema.check_shop(&shop).unwrap_err();
        assert_eq!(err.field(), "name");

        shop.name = None;
        shop.loc = Some(GeoPoint::new(f64::NAN, 0.0));
        assert_eq!(
            schema.check_shop(&shop),
            Err(SchemaViolation::InvalidLocation)
        );
    }
}
