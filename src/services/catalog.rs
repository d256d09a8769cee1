//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::product::{
        CreateProduct, CreateVariant, Product, ProductQuery, ProductShort, UpdateProduct, Variant,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search products with filters
    pub async fn search_products(&self, query: &ProductQuery) -> AppResult<(Vec<ProductShort>, i64)> {
        self.repository.products.search(query).await
    }

    /// Get product by ID with variants
    pub async fn get_product(&self, id: i32) -> AppResult<Product> {
        self.repository.products.get(id).await
    }

    /// Create a new product. Reference must be unique among live products.
    pub async fn create_product(&self, product: CreateProduct) -> AppResult<Product> {
        if let Some(reference) = product.reference.as_deref().filter(|r| !r.trim().is_empty()) {
            if self.repository.products.find_by_reference(reference).await?.is_some() {
                return Err(AppError::Conflict(
                    "A product with this reference already exists".to_string(),
                ));
            }
        }
        self.repository.products.create(&product).await
    }

    /// Update an existing product
    pub async fn update_product(&self, id: i32, product: UpdateProduct) -> AppResult<Product> {
        if let Some(reference) = product.reference.as_deref().filter(|r| !r.trim().is_empty()) {
            if let Some(existing) = self.repository.products.find_by_reference(reference).await? {
                if existing != id {
                    return Err(AppError::Conflict(
                        "A product with this reference already exists".to_string(),
                    ));
                }
            }
        }
        self.repository.products.update(id, &product).await
    }

    /// Archive (soft-delete) a product
    pub async fn archive_product(&self, id: i32) -> AppResult<()> {
        self.repository.products.archive(id).await
    }

    /// Get variants for a product
    pub async fn get_variants(&self, product_id: i32) -> AppResult<Vec<Variant>> {
        // Verify product exists
        self.repository.products.get(product_id).await?;
        self.repository.products.variants(product_id).await
    }

    /// Create a variant for a product. Sku must be unique catalog-wide.
    pub async fn create_variant(&self, product_id: i32, variant: CreateVariant) -> AppResult<Variant> {
        self.repository.products.get(product_id).await?;
        if variant.sku.trim().is_empty() {
            return Err(AppError::Validation("sku is required".to_string()));
        }
        if self.repository.products.variant_sku_exists(&variant.sku, None).await? {
            return Err(AppError::Conflict(
                "A variant with this sku already exists".to_string(),
            ));
        }
        self.repository.products.create_variant(product_id, &variant).await
    }

    /// Update a variant's stock count
    pub async fn update_variant_stock(
        &self,
        product_id: i32,
        variant_id: i32,
        stock: i32,
    ) -> AppResult<Variant> {
        // Verify variant belongs to product
        let variants = self.repository.products.variants(product_id).await?;
        if !variants.iter().any(|v| v.id == variant_id) {
            return Err(AppError::NotFound(format!(
                "Variant {} not found for product {}",
                variant_id, product_id
            )));
        }
        self.repository.products.update_variant_stock(variant_id, stock).await
    }
}
