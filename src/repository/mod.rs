//! Repository layer for database operations

pub mod collections;
pub mod products;
pub mod taxonomy;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::error::AppResult;
use crate::import::matcher::{CatalogLookup, CollectionRef};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub products: products::ProductsRepository,
    pub collections: collections::CollectionsRepository,
    pub taxonomy: taxonomy::TaxonomyRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            products: products::ProductsRepository::new(pool.clone()),
            collections: collections::CollectionsRepository::new(pool.clone()),
            taxonomy: taxonomy::TaxonomyRepository::new(pool.clone()),
            pool,
        }
    }
}

/// The matcher's read-only view of the catalog
#[async_trait]
impl CatalogLookup for Repository {
    async fn find_product_by_reference(&self, reference: &str) -> AppResult<Option<i32>> {
        self.products.find_by_reference(reference).await
    }

    async fn find_product_by_name(&self, name: &str) -> AppResult<Option<i32>> {
        self.products.find_by_name(name).await
    }

    async fn find_variant_by_sku(&self, sku: &str) -> AppResult<Option<i32>> {
        self.products.find_variant_by_sku(sku).await
    }

    async fn collection_by_id(&self, id: i32) -> AppResult<Option<CollectionRef>> {
        Ok(self
            .collections
            .find_by_id(id)
            .await?
            .map(|c| CollectionRef { id: c.id, name: c.name }))
    }

    async fn active_collection(&self) -> AppResult<Option<CollectionRef>> {
        Ok(self
            .collections
            .find_active()
            .await?
            .map(|c| CollectionRef { id: c.id, name: c.name }))
    }
}
