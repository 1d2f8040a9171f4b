//! Catalog management on top of the document store.

use crate::batch::{run_sequential, BatchResult};
use crate::catalog::{Product, ProductDraft, ProductUpdate, SlugAllocator};
use crate::ids::ProductId;
use crate::CommerceError;
use shop_store::{DocumentStore, DocumentStoreExt, Query, PRODUCTS};
use std::sync::Arc;

/// Field products are ordered by, newest first.
const CREATED_AT: &str = "createdAt";

/// Creates, lists, edits and deletes products.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
    slugs: SlugAllocator,
}

impl CatalogService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            slugs: SlugAllocator::new(store.clone()),
            store,
        }
    }

    pub fn slugs(&self) -> &SlugAllocator {
        &self.slugs
    }

    /// Validate and persist a new product.
    ///
    /// A typed slug must be free; otherwise one is suggested from the
    /// title. Titles with no usable slug produce a product without one.
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, CommerceError> {
        draft.validate()?;

        let slug = match draft.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(requested) => Some(self.slugs.claim(requested).await?),
            None => Some(self.slugs.suggest(&draft.title).await).filter(|s| !s.is_empty()),
        };

        let mut product = draft.into_product(slug);
        let id = self.store.insert(PRODUCTS, &product).await?;
        product.id = ProductId::new(id);

        tracing::info!(product_id = %product.id, slug = ?product.slug, "product created");
        Ok(product)
    }

    /// Products, newest first.
    pub async fn list(&self, limit: Option<usize>) -> Result<Vec<Product>, CommerceError> {
        let mut query = Query::new().order_by_desc(CREATED_AT);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        Ok(self.store.query_as(PRODUCTS, &query).await?)
    }

    pub async fn get(&self, id: &ProductId) -> Result<Product, CommerceError> {
        self.store
            .get_as(PRODUCTS, id.as_str())
            .await?
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, CommerceError> {
        let query = Query::new().where_eq("slug", slug).limit(1);
        let mut found: Vec<Product> = self.store.query_as(PRODUCTS, &query).await?;
        Ok(found.pop())
    }

    /// Resolve a product URL key: slug first, then id.
    pub async fn resolve(&self, key: &str) -> Result<Product, CommerceError> {
        if let Some(product) = self.find_by_slug(key).await? {
            return Ok(product);
        }
        self.get(&ProductId::new(key)).await
    }

    /// Apply an admin edit. A changed slug is re-checked for uniqueness.
    pub async fn update(&self, id: &ProductId, update: ProductUpdate) -> Result<Product, CommerceError> {
        update.validate()?;
        let current = self.get(id).await?;

        let slug = match update.slug.as_deref() {
            Some(requested) => {
                let normalized = super::slugify(requested);
                if current.slug.as_deref() == Some(normalized.as_str()) {
                    None
                } else {
                    Some(self.slugs.claim(requested).await?)
                }
            }
            None => None,
        };

        let fields = update.to_fields(slug.as_deref());
        if !fields.is_empty() {
            self.store.update(PRODUCTS, id.as_str(), fields).await?;
            tracing::info!(product_id = %id, "product updated");
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: &ProductId) -> Result<(), CommerceError> {
        self.store.delete(PRODUCTS, id.as_str()).await.map_err(|e| {
            if e.is_not_found() {
                CommerceError::ProductNotFound(id.to_string())
            } else {
                e.into()
            }
        })?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// Delete several products one at a time.
    pub async fn delete_many(&self, ids: &[String]) -> BatchResult {
        run_sequential("delete products", ids, |id| async move {
            self.delete(&ProductId::new(id)).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FlakyStore;
    use shop_store::InMemoryStore;

    fn service() -> CatalogService {
        CatalogService::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_derives_slug() {
        let catalog = service();
        let first = catalog.create(ProductDraft::new("Raw Honey", 900.0)).await.unwrap();
        let second = catalog.create(ProductDraft::new("Raw  Honey!", 950.0)).await.unwrap();

        assert!(first.id.is_assigned());
        assert_eq!(first.slug.as_deref(), Some("raw-honey"));
        assert_eq!(second.slug.as_deref(), Some("raw-honey-1"));
    }

    #[tokio::test]
    async fn test_create_with_taken_custom_slug_fails() {
        let catalog = service();
        catalog.create(ProductDraft::new("Ghee", 1200.0)).await.unwrap();

        let draft = ProductDraft {
            slug: Some("Ghee".to_string()),
            ..ProductDraft::new("Cow Ghee", 1300.0)
        };
        let err = catalog.create(draft).await.unwrap_err();
        assert!(matches!(err, CommerceError::SlugTaken(_)));
        assert_eq!(catalog.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_without_usable_slug() {
        let catalog = service();
        let product = catalog.create(ProductDraft::new("মধু", 500.0)).await.unwrap();
        assert_eq!(product.slug, None);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected() {
        let catalog = service();
        let err = catalog.create(ProductDraft::default()).await.unwrap_err();
        assert!(err.is_user_error());
    }

    #[tokio::test]
    async fn test_list_newest_first_and_resolve() {
        let catalog = service();
        let mut older = ProductDraft::new("Dates", 600.0).into_product(Some("dates".into()));
        older.created_at = 1_000;
        let mut newer = ProductDraft::new("Figs", 700.0).into_product(Some("figs".into()));
        newer.created_at = 2_000;
        catalog.store.insert(PRODUCTS, &older).await.unwrap();
        let figs_id = catalog.store.insert(PRODUCTS, &newer).await.unwrap();

        let listed = catalog.list(Some(1)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Figs");

        assert_eq!(catalog.resolve("dates").await.unwrap().title, "Dates");
        assert_eq!(catalog.resolve(&figs_id).await.unwrap().title, "Figs");
        assert!(matches!(
            catalog.resolve("nothing").await,
            Err(CommerceError::ProductNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_tolerates_loosely_typed_products() {
        let catalog = service();
        catalog.create(ProductDraft::new("Dates", 600.0)).await.unwrap();
        let legacy = serde_json::json!({
            "title": "Old Ghee",
            "price": "1200",
            "slug": "old-ghee",
            "createdAt": { "seconds": 1_700_000_000, "nanoseconds": 0 }
        });
        let fields = legacy.as_object().cloned().unwrap();
        catalog.store.create(PRODUCTS, fields).await.unwrap();

        let listed = catalog.list(None).await.unwrap();
        assert_eq!(listed.len(), 2);
        let ghee = catalog.resolve("old-ghee").await.unwrap();
        assert_eq!(ghee.price, 1200.0);
        assert_eq!(ghee.created_at, 1_700_000_000_000);
    }

    #[tokio::test]
    async fn test_update_keeps_own_slug_and_rejects_taken() {
        let catalog = service();
        let honey = catalog.create(ProductDraft::new("Honey", 900.0)).await.unwrap();
        catalog.create(ProductDraft::new("Ghee", 1200.0)).await.unwrap();

        let updated = catalog
            .update(
                &honey.id,
                ProductUpdate {
                    price: Some(950.0),
                    slug: Some("honey".into()),
                    ..ProductUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, 950.0);
        assert_eq!(updated.slug.as_deref(), Some("honey"));

        let err = catalog
            .update(
                &honey.id,
                ProductUpdate {
                    slug: Some("ghee".into()),
                    ..ProductUpdate::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::SlugTaken(_)));
    }

    #[tokio::test]
    async fn test_delete_many_reports_failures() {
        let store = Arc::new(FlakyStore {
            fail_ids: vec!["locked".to_string()],
            ..FlakyStore::default()
        });
        let catalog = CatalogService::new(store.clone());
        let a = catalog.create(ProductDraft::new("A", 1.0)).await.unwrap();
        let b = catalog.create(ProductDraft::new("B", 2.0)).await.unwrap();

        let ids = vec![a.id.to_string(), "locked".to_string(), b.id.to_string()];
        let result = catalog.delete_many(&ids).await;

        assert_eq!(result.succeeded.len(), 2);
        assert_eq!(result.failed[0].id, "locked");
        assert!(catalog.list(None).await.unwrap().is_empty());
    }
}
