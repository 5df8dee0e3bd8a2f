//! In-memory shop store.
//!
//! Holds every shop in a single map behind a `tokio` `RwLock`. Writes check
//! email uniqueness and mutate under the same write guard, which gives the
//! guarantee the unique index gives [`super::PgShopStore`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use shop_directory_core::ShopId;

use super::{DUPLICATE_EMAIL, RepositoryError, ShopStore};
use crate::models::{Shop, ShopDocument, ShopFilter, ShopSchema};

#[derive(Default)]
struct Shelf {
    shops: HashMap<ShopId, Shop>,
}

impl Shelf {
    fn ensure_email_free(&self, shop: &Shop) -> Result<(), RepositoryError> {
        let taken = self
            .shops
            .values()
            .any(|other| other.id != shop.id && other.email == shop.email);
        if taken {
            return Err(RepositoryError::Conflict(DUPLICATE_EMAIL.to_string()));
        }
        Ok(())
    }
}

/// Shop store that keeps records in process memory.
#[derive(Clone)]
pub struct MemoryShopStore {
    shelf: Arc<RwLock<Shelf>>,
    schema: Arc<ShopSchema>,
}

impl MemoryShopStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(schema: Arc<ShopSchema>) -> Self {
        Self {
            shelf: Arc::new(RwLock::new(Shelf::default())),
            schema,
        }
    }

    /// Number of stored shops.
    pub async fn len(&self) -> usize {
        self.shelf.read().await.shops.len()
    }

    /// Returns `true` if no shops are stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ShopStore for MemoryShopStore {
    async fn find_by_id(&self, id: ShopId) -> Result<Option<Shop>, RepositoryError> {
        Ok(self.shelf.read().await.shops.get(&id).cloned())
    }

    async fn list(&self, filter: &ShopFilter) -> Result<Vec<Shop>, RepositoryError> {
        let shelf = self.shelf.read().await;
        let mut shops: Vec<&Shop> = shelf.shops.values().filter(|s| filter.matches(s)).collect();
        shops.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let skip = usize::try_from(filter.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(filter.per_page).unwrap_or(usize::MAX);
        Ok(shops.into_iter().skip(skip).take(take).cloned().collect())
    }

    async fn insert(&self, document: ShopDocument) -> Result<Shop, RepositoryError> {
        self.schema.check_document(&document)?;

        let shop = Shop::new(ShopId::generate(), document, Utc::now());
        let mut shelf = self.shelf.write().await;
        shelf.ensure_email_free(&shop)?;
        shelf.shops.insert(shop.id, shop.clone());
        Ok(shop)
    }

    async fn save(&self, shop: &Shop) -> Result<Shop, RepositoryError> {
        self.schema.check_shop(shop)?;

        let mut shelf = self.shelf.write().await;
        shelf.ensure_email_free(shop)?;
        let stored = shelf
            .shops
            .get_mut(&shop.id)
            .ok_or(RepositoryError::NotFound)?;

        let created_at = stored.created_at;
        *stored = shop.clone();
        stored.created_at = created_at;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn replace(&self, id: ShopId, document: ShopDocument) -> Result<Shop, RepositoryError> {
        self.schema.check_document(&document)?;

        let now = Utc::now();
        let mut shelf = self.shelf.write().await;
        let shop = match shelf.shops.get(&id) {
            Some(existing) => {
                let mut shop = existing.clone();
                shop.overwrite(document, now);
                shop
            }
            None => Shop::new(id, document, now),
        };

        shelf.ensure_email_free(&shop)?;
        shelf.shops.insert(id, shop.clone());
        Ok(shop)
    }

    async fn delete(&self, id: ShopId) -> Result<(), RepositoryError> {
        self.shelf.write().await.shops.remove(&id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use shop_directory_core::{Email, ShopRole};

    use super::*;
    use crate::models::SchemaViolation;

    fn store() -> MemoryShopStore {
        MemoryShopStore::new(Arc::new(ShopSchema::default()))
    }

    fn document(email: &str) -> ShopDocument {
        ShopDocument {
            email: Email::parse(email).unwrap(),
            address: "123 Main St".to_string(),
            name: None,
            picture: None,
            loc: None,
            role: ShopRole::User,
        }
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = store();
        let shop = store.insert(document("a@b.com")).await.unwrap();

        let fetched = store.get(&shop.id.to_hex()).await.unwrap();
        assert_eq!(fetched, shop);
        assert_eq!(shop.created_at, shop.updated_at);
    }

    #[tokio::test]
    async fn test_get_malformed_or_absent_is_not_found() {
        let store = store();
        assert!(matches!(
            store.get("not-an-id").await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            store.get(&ShopId::generate().to_hex()).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = store();
        store.insert(document("a@b.com")).await.unwrap();

        let err = store.insert(document("A@B.com ")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_save_rejects_email_owned_by_another_shop() {
        let store = store();
        store.insert(document("first@example.com")).await.unwrap();
        let mut second = store.insert(document("second@example.com")).await.unwrap();

        second.email = Email::parse("first@example.com").unwrap();
        assert!(matches!(
            store.save(&second).await,
            Err(RepositoryError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_save_enforces_schema() {
        let store = store();
        let mut shop = store.insert(document("a@b.com")).await.unwrap();

        shop.address = "tiny".to_string();
        assert!(matches!(
            store.save(&shop).await,
            Err(RepositoryError::Invalid(SchemaViolation::AddressLength { .. }))
        ));
    }

    #[tokio::test]
    async fn test_replace_keeps_identity_and_upserts() {
        let store = store();
        let shop = store.insert(document("a@b.com")).await.unwrap();

        let replaced = store
            .replace(shop.id, document("c@d.com"))
            .await
            .unwrap();
        assert_eq!(replaced.id, shop.id);
        assert_eq!(replaced.created_at, shop.created_at);
        assert_eq!(replaced.email.as_str(), "c@d.com");

        let fresh_id = ShopId::generate();
        let created = store.replace(fresh_id, document("e@f.com")).await.unwrap();
        assert_eq!(created.id, fresh_id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_list_pages_newest_first() {
        let store = store();
        let mut ids = Vec::new();
        for i in 0..15 {
            let shop = store
                .insert(document(&format!("shop{i}@example.com")))
                .await
                .unwrap();
            ids.push(shop.id);
        }

        let all = store.list(&ShopFilter::default()).await.unwrap();
        assert_eq!(all.len(), 15);
        assert!(
            all.windows(2)
                .all(|w| (w[0].created_at, w[0].id) >= (w[1].created_at, w[1].id))
        );

        let page_two = store
            .list(&ShopFilter {
                page: 2,
                per_page: 10,
                ..ShopFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(page_two.len(), 5);
        assert_eq!(page_two, all[10..].to_vec());
    }

    #[tokio::test]
    async fn test_list_filters_by_email() {
        let store = store();
        store.insert(document("a@b.com")).await.unwrap();
        store.insert(document("c@d.com")).await.unwrap();

        let found = store
            .list(&ShopFilter {
                email: Some("C@D.com".to_string()),
                ..ShopFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].email.as_str(), "c@d.com");
    }

    #[tokio::test]
    async fn test_list_filters_by_exact_address() {
        let store = store();
        let mut elsewhere = document("c@d.com");
        elsewhere.address = "9 Elsewhere Ave".to_string();
        let target = store.insert(elsewhere).await.unwrap();
        store.insert(document("a@b.com")).await.unwrap();

        let found = store
            .list(&ShopFilter {
                address: Some("9 Elsewhere Ave".to_string()),
                ..ShopFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(found, vec![target]);

        let none = store
            .list(&ShopFilter {
                address: Some("9 elsewhere ave".to_string()),
                ..ShopFilter::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes() {
        let store = store();
        let shop = store.insert(document("a@b.com")).await.unwrap();

        store.delete(shop.id).await.unwrap();
        assert!(store.is_empty().await);
        store.delete(shop.id).await.unwrap();
    }
}
