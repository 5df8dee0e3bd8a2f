//! Shop identifiers.
//!
//! A [`ShopId`] is a 12-byte value rendered as 24 lowercase hex characters:
//! 4 bytes of big-endian Unix seconds, 5 bytes of per-process randomness, and
//! a 3-byte big-endian counter. Ids sort roughly by creation time but are
//! otherwise opaque.

use core::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`ShopId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopIdError {
    /// The input is not exactly 24 characters long.
    #[error("shop id must be {expected} characters (got {actual})")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length of the input.
        actual: usize,
    },
    /// The input contains a non-hexadecimal character.
    #[error("shop id must be hexadecimal")]
    NotHex,
}

/// Unique, immutable identifier of a shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShopId([u8; 12]);

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: AtomicU32 = AtomicU32::new(0);

impl ShopId {
    /// Length of the hex representation.
    pub const HEX_LENGTH: usize = 24;

    /// Generate a fresh id from the current time.
    #[must_use]
    pub fn generate() -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        // Truncation is intended: the timestamp field is 32 bits wide.
        #[allow(clippy::cast_possible_truncation)]
        let seconds = seconds as u32;
        let process = PROCESS_UNIQUE.get_or_init(rand::random::<[u8; 5]>);
        let count = COUNTER.fetch_add(1, Ordering::Relaxed);

        let [t0, t1, t2, t3] = seconds.to_be_bytes();
        let [_, c0, c1, c2] = count.to_be_bytes();
        let [p0, p1, p2, p3, p4] = *process;
        Self([t0, t1, t2, t3, p0, p1, p2, p3, p4, c0, c1, c2])
    }

    /// Parse an id from its 24-character hex form (either case).
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 24 hex characters.
    pub fn parse(s: &str) -> Result<Self, ShopIdError> {
        if s.len() != Self::HEX_LENGTH {
            return Err(ShopIdError::InvalidLength {
                expected: Self::HEX_LENGTH,
                actual: s.len(),
            });
        }

        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| ShopIdError::NotHex)?;
        Ok(Self(bytes))
    }

    /// Returns `true` if `s` is a syntactically valid id.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// Returns the raw bytes of the id.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Returns the lowercase hex representation.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ShopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ShopId {
    type Err = ShopIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ShopId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ShopId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ShopId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ShopId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(s.trim_end())?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ShopId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.to_hex(), buf)
    }
}
