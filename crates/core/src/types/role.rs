//! Shop role.

use serde::{Deserialize, Serialize};

/// Privilege level stored on a shop record.
///
/// Only admins may change it. It is never part of the client projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ShopRole {
    /// Regular shop.
    #[default]
    User,
    /// Elevated shop.
    Admin,
}

impl ShopRole {
    /// Returns `true` for the elevated role.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for ShopRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for ShopRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid shop role: {s}")),
        }
    }
}
