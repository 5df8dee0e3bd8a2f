//! `PostgreSQL` shop store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use shop_directory_core::{Email, GeoPoint, ShopId, ShopRole};

use super::{DUPLICATE_EMAIL, RepositoryError, ShopStore};
use crate::models::{Shop, ShopDocument, ShopFilter, ShopSchema};

const SHOP_COLUMNS: &str =
    "id, email, address, name, picture, loc_lng, loc_lat, role, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ShopRow {
    id: ShopId,
    email: String,
    address: String,
    name: Option<String>,
    picture: Option<String>,
    loc_lng: Option<f64>,
    loc_lat: Option<f64>,
    role: ShopRole,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ShopRow> for Shop {
    type Error = RepositoryError;

    fn try_from(row: ShopRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        let loc = match (row.loc_lng, row.loc_lat) {
            (Some(lng), Some(lat)) => Some(GeoPoint::new(lng, lat)),
            (None, None) => None,
            _ => {
                return Err(RepositoryError::DataCorruption(format!(
                    "shop {} has a partial location",
                    row.id
                )));
            }
        };

        Ok(Self {
            id: row.id,
            email,
            address: row.address,
            name: row.name,
            picture: row.picture,
            loc,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Map a write failure, turning a unique-email violation into a conflict.
fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(DUPLICATE_EMAIL.to_string());
    }
    RepositoryError::Database(e)
}

/// Shop store backed by the `shops` table.
#[derive(Clone)]
pub struct PgShopStore {
    pool: PgPool,
    schema: Arc<ShopSchema>,
}

impl PgShopStore {
    /// Create a new store over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool, schema: Arc<ShopSchema>) -> Self {
        Self { pool, schema }
    }
}

#[async_trait]
impl ShopStore for PgShopStore {
    #[instrument(skip(self), fields(shop_id = %id))]
    async fn find_by_id(&self, id: ShopId) -> Result<Option<Shop>, RepositoryError> {
        let row = sqlx::query_as::<_, ShopRow>(&format!(
            "SELECT {SHOP_COLUMNS} FROM shops WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Shop::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &ShopFilter) -> Result<Vec<Shop>, RepositoryError> {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {SHOP_COLUMNS} FROM shops WHERE TRUE"));

        if let Some(name) = &filter.name {
            query.push(" AND name = ").push_bind(name.clone());
        }
        if let Some(email) = filter.email_key() {
            query.push(" AND email = ").push_bind(email);
        }
        if let Some(address) = &filter.address {
            query.push(" AND address = ").push_bind(address.clone());
        }

        let offset = i64::try_from(filter.offset()).unwrap_or(i64::MAX);
        query
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(filter.per_page))
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = query
            .build_query_as::<ShopRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Shop::try_from).collect()
    }

    #[instrument(skip(self, document), fields(email = %document.email))]
    async fn insert(&self, document: ShopDocument) -> Result<Shop, RepositoryError> {
        self.schema.check_document(&document)?;

        let id = ShopId::generate();
        let now = Utc::now();
        let row = sqlx::query_as::<_, ShopRow>(&format!(
            r"
            INSERT INTO shops (id, email, address, name, picture, loc_lng, loc_lat, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {SHOP_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&document.email)
        .bind(&document.address)
        .bind(&document.name)
        .bind(&document.picture)
        .bind(document.loc.map(|p| p.longitude))
        .bind(document.loc.map(|p| p.latitude))
        .bind(document.role)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        tracing::info!(shop_id = %id, "Shop created");
        Shop::try_from(row)
    }

    #[instrument(skip(self, shop), fields(shop_id = %shop.id))]
    async fn save(&self, shop: &Shop) -> Result<Shop, RepositoryError> {
        self.schema.check_shop(shop)?;

        let row = sqlx::query_as::<_, ShopRow>(&format!(
            r"
            UPDATE shops
            SET email = $2, address = $3, name = $4, picture = $5,
                loc_lng = $6, loc_lat = $7, role = $8, updated_at = $9
            WHERE id = $1
            RETURNING {SHOP_COLUMNS}
            "
        ))
        .bind(shop.id)
        .bind(&shop.email)
        .bind(&shop.address)
        .bind(&shop.name)
        .bind(&shop.picture)
        .bind(shop.loc.map(|p| p.longitude))
        .bind(shop.loc.map(|p| p.latitude))
        .bind(shop.role)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.ok_or(RepositoryError::NotFound).and_then(Shop::try_from)
    }

    #[instrument(skip(self, document), fields(shop_id = %id))]
    async fn replace(&self, id: ShopId, document: ShopDocument) -> Result<Shop, RepositoryError> {
        self.schema.check_document(&document)?;

        let row = sqlx::query_as::<_, ShopRow>(&format!(
            r"
            INSERT INTO shops (id, email, address, name, picture, loc_lng, loc_lat, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            ON CONFLICT (id) DO UPDATE
            SET email = EXCLUDED.email,
                address = EXCLUDED.address,
                name = EXCLUDED.name,
                picture = EXCLUDED.picture,
                loc_lng = EXCLUDED.loc_lng,
                loc_lat = EXCLUDED.loc_lat,
                role = EXCLUDED.role,
                updated_at = EXCLUDED.updated_at
            RETURNING {SHOP_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&document.email)
        .bind(&document.address)
        .bind(&document.name)
        .bind(&document.picture)
        .bind(document.loc.map(|p| p.longitude))
        .bind(document.loc.map(|p| p.latitude))
        .bind(document.role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Shop::try_from(row)
    }

    #[instrument(skip(self), fields(shop_id = %id))]
    async fn delete(&self, id: ShopId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shops WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            tracing::info!("Shop deleted");
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::borrow::Cow;
    use std::error::Error as StdError;

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    fn row() -> ShopRow {
        let now = Utc::now();
        ShopRow {
            id: ShopId::generate(),
            email: "owner@example.com".to_string(),
            address: "123 Main St".to_string(),
            name: Some("Corner".to_string()),
            picture: None,
            loc_lng: Some(-73.97),
            loc_lat: Some(40.77),
            role: ShopRole::User,
            created_at: now,
            updated_at: now,
        }
    }

    #[derive(Debug)]
    struct UniqueViolation;

    impl std::fmt::Display for UniqueViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "duplicate key value violates unique constraint")
        }
    }

    impl StdError for UniqueViolation {}

    impl DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("23505"))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn test_row_converts_to_shop() {
        let row = row();
        let id = row.id;
        let shop = Shop::try_from(row).unwrap();

        assert_eq!(shop.id, id);
        assert_eq!(shop.email.as_str(), "owner@example.com");
        assert_eq!(shop.loc, Some(GeoPoint::new(-73.97, 40.77)));
    }

    #[test]
    fn test_row_without_location_converts() {
        let shop = Shop::try_from(ShopRow {
            loc_lng: None,
            loc_lat: None,
            ..row()
        })
        .unwrap();
        assert_eq!(shop.loc, None);
    }

    #[test]
    fn test_partial_location_is_data_corruption() {
        let err = Shop::try_from(ShopRow {
            loc_lat: None,
            ..row()
        })
        .unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }

    #[test]
    fn test_bad_stored_email_is_data_corruption() {
        let err = Shop::try_from(ShopRow {
            email: "not-an-email".to_string(),
            ..row()
        })
        .unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err = map_write_error(sqlx::Error::Database(Box::new(UniqueViolation)));
        match err {
            RepositoryError::Conflict(message) => assert_eq!(message, DUPLICATE_EMAIL),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_other_write_errors_stay_database_errors() {
        assert!(matches!(
            map_write_error(sqlx::Error::RowNotFound),
            RepositoryError::Database(_)
        ));
    }
}
