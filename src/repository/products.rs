//! Products repository for database operations.
//!
//! Catalog matching queries are case-insensitive exact matches on the live
//! (non-archived) catalog; archived products never participate in matching.

use sqlx::{Pool, Postgres, Row, Transaction};

use crate::{
    error::{AppError, AppResult},
    import::grouper::{GroupedProduct, GroupedVariant},
    models::product::{
        CreateProduct, CreateVariant, Product, ProductQuery, ProductShort, UpdateProduct, Variant,
    },
};

const PRODUCT_COLUMNS: &str = "id, name, reference, description, price, brand, category, \
     materials, care_instructions, made_in, collection_id, created_at, updated_at, archived_at";

#[derive(Clone)]
pub struct ProductsRepository {
    pool: Pool<Postgres>,
}

impl ProductsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Search products with filters and pagination
    pub async fn search(&self, query: &ProductQuery) -> AppResult<(Vec<ProductShort>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 200);

        let products = sqlx::query_as::<_, ProductShort>(
            r#"
            SELECT p.id, p.name, p.reference, p.price, p.brand, p.category, p.collection_id,
                   COUNT(v.id) AS variant_count,
                   COALESCE(SUM(v.stock), 0)::BIGINT AS total_stock
            FROM products p
            LEFT JOIN variants v ON v.product_id = p.id
            WHERE p.archived_at IS NULL
              AND ($1::text IS NULL OR p.name ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR LOWER(p.reference) = LOWER($2))
              AND ($3::text IS NULL OR LOWER(p.category) = LOWER($3))
              AND ($4::text IS NULL OR LOWER(p.brand) = LOWER($4))
              AND ($5::int4 IS NULL OR p.collection_id = $5)
            GROUP BY p.id
            ORDER BY p.name, p.id
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(&query.name)
        .bind(&query.reference)
        .bind(&query.category)
        .bind(&query.brand)
        .bind(query.collection_id)
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM products p
            WHERE p.archived_at IS NULL
              AND ($1::text IS NULL OR p.name ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR LOWER(p.reference) = LOWER($2))
              AND ($3::text IS NULL OR LOWER(p.category) = LOWER($3))
              AND ($4::text IS NULL OR LOWER(p.brand) = LOWER($4))
              AND ($5::int4 IS NULL OR p.collection_id = $5)
            "#,
        )
        .bind(&query.name)
        .bind(&query.reference)
        .bind(&query.category)
        .bind(&query.brand)
        .bind(query.collection_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((products, total))
    }

    /// Get a product with its variants
    pub async fn get(&self, id: i32) -> AppResult<Product> {
        let mut product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = $1 AND archived_at IS NULL",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;

        product.variants = self.variants(id).await?;
        Ok(product)
    }

    /// All variants of a product, in creation order
    pub async fn variants(&self, product_id: i32) -> AppResult<Vec<Variant>> {
        Ok(sqlx::query_as::<_, Variant>(
            "SELECT id, product_id, color, size, sku, stock, created_at, updated_at
             FROM variants WHERE product_id = $1 ORDER BY id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Find a live product by exact reference (case-insensitive)
    pub async fn find_by_reference(&self, reference: &str) -> AppResult<Option<i32>> {
        Ok(sqlx::query_scalar(
            "SELECT id FROM products
             WHERE LOWER(reference) = LOWER($1) AND archived_at IS NULL",
        )
        .bind(reference.trim())
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Find a live product by exact name (case-insensitive)
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<i32>> {
        Ok(sqlx::query_scalar(
            "SELECT id FROM products
             WHERE LOWER(name) = LOWER($1) AND archived_at IS NULL
             ORDER BY id LIMIT 1",
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Find a variant by exact sku (case-insensitive), live products only
    pub async fn find_variant_by_sku(&self, sku: &str) -> AppResult<Option<i32>> {
        Ok(sqlx::query_scalar(
            "SELECT v.id FROM variants v
             JOIN products p ON p.id = v.product_id
             WHERE LOWER(v.sku) = LOWER($1) AND p.archived_at IS NULL",
        )
        .bind(sku.trim())
        .fetch_optional(&self.pool)
        .await?)
    }

    /// True if a variant with this sku exists, optionally excluding one id
    pub async fn variant_sku_exists(&self, sku: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: Option<i32> = sqlx::query_scalar(
            "SELECT v.id FROM variants v
             WHERE LOWER(v.sku) = LOWER($1) AND ($2::int4 IS NULL OR v.id <> $2)",
        )
        .bind(sku.trim())
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(exists.is_some())
    }

    // =========================================================================
    // WRITE (admin CRUD)
    // =========================================================================

    pub async fn create(&self, product: &CreateProduct) -> AppResult<Product> {
        let created = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, reference, description, price, brand, category,
                                  materials, care_instructions, made_in, collection_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(product.name.trim())
        .bind(product.reference.as_deref().map(str::trim))
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(&product.materials)
        .bind(&product.care_instructions)
        .bind(&product.made_in)
        .bind(product.collection_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Partial update; missing fields keep their current value
    pub async fn update(&self, id: i32, product: &UpdateProduct) -> AppResult<Product> {
        let updated = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                reference = COALESCE($3, reference),
                description = COALESCE($4, description),
                price = COALESCE($5, price),
                brand = COALESCE($6, brand),
                category = COALESCE($7, category),
                materials = COALESCE($8, materials),
                care_instructions = COALESCE($9, care_instructions),
                made_in = COALESCE($10, made_in),
                collection_id = COALESCE($11, collection_id),
                updated_at = now()
            WHERE id = $1 AND archived_at IS NULL
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .bind(&product.name)
        .bind(&product.reference)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(&product.materials)
        .bind(&product.care_instructions)
        .bind(&product.made_in)
        .bind(product.collection_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;
        Ok(updated)
    }

    /// Soft-delete a product
    pub async fn archive(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE products SET archived_at = now(), updated_at = now()
             WHERE id = $1 AND archived_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Product {} not found", id)));
        }
        Ok(())
    }

    pub async fn create_variant(&self, product_id: i32, variant: &CreateVariant) -> AppResult<Variant> {
        Ok(sqlx::query_as::<_, Variant>(
            r#"
            INSERT INTO variants (product_id, color, size, sku, stock)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, product_id, color, size, sku, stock, created_at, updated_at
            "#,
        )
        .bind(product_id)
        .bind(variant.color.trim())
        .bind(variant.size.trim())
        .bind(variant.sku.trim())
        .bind(variant.stock)
        .fetch_one(&self.pool)
        .await?)
    }

    pub async fn update_variant_stock(&self, variant_id: i32, stock: i32) -> AppResult<Variant> {
        sqlx::query_as::<_, Variant>(
            r#"
            UPDATE variants SET stock = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, product_id, color, size, sku, stock, created_at, updated_at
            "#,
        )
        .bind(variant_id)
        .bind(stock)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Variant {} not found", variant_id)))
    }

    // =========================================================================
    // WRITE (import executor, transaction-per-product)
    // =========================================================================

    pub async fn import_create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        group: &GroupedProduct,
        collection_id: Option<i32>,
    ) -> AppResult<i32> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (name, reference, description, price, brand, category,
                                  materials, care_instructions, made_in, collection_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&group.name)
        .bind(&group.reference)
        .bind(&group.description)
        .bind(group.price)
        .bind(&group.brand)
        .bind(&group.category)
        .bind(&group.materials)
        .bind(&group.care_instructions)
        .bind(&group.made_in)
        .bind(collection_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row.get("id"))
    }

    /// Update a matched product from its group. Empty group attributes keep
    /// the stored value; an import never clears a field, and a resolved
    /// collection replaces the assignment while an unresolved one leaves it.
    pub async fn import_update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        group: &GroupedProduct,
        collection_id: Option<i32>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE products SET
                name = $2,
                description = COALESCE($3, description),
                price = $4,
                brand = COALESCE($5, brand),
                category = COALESCE($6, category),
                materials = COALESCE($7, materials),
                care_instructions = COALESCE($8, care_instructions),
                made_in = COALESCE($9, made_in),
                collection_id = COALESCE($10, collection_id),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.price)
        .bind(&group.brand)
        .bind(&group.category)
        .bind(&group.materials)
        .bind(&group.care_instructions)
        .bind(&group.made_in)
        .bind(collection_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn import_create_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product_id: i32,
        variant: &GroupedVariant,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO variants (product_id, color, size, sku, stock)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(product_id)
        .bind(&variant.color)
        .bind(&variant.size)
        .bind(&variant.sku)
        .bind(variant.stock)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Stock-only update: identity fields of an existing variant are never
    /// touched by an import.
    pub async fn import_update_variant_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant_id: i32,
        stock: i32,
    ) -> AppResult<()> {
        sqlx::query("UPDATE variants SET stock = $2, updated_at = now() WHERE id = $1")
            .bind(variant_id)
            .bind(stock)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Seed a placeholder product + variant from a pasted stock row. Name and
    /// sku are both the reference; the rest is completed later through the
    /// product edit screen.
    pub async fn paste_create_placeholder(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reference: &str,
        brand: Option<&str>,
        category: Option<&str>,
        stock: i32,
    ) -> AppResult<i32> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (name, reference, price, brand, category)
            VALUES ($1, $1, 0, $2, $3)
            RETURNING id
            "#,
        )
        .bind(reference)
        .bind(brand)
        .bind(category)
        .fetch_one(&mut **tx)
        .await?;
        let product_id: i32 = row.get("id");

        sqlx::query(
            "INSERT INTO variants (product_id, color, size, sku, stock)
             VALUES ($1, '', '', $2, $3)",
        )
        .bind(product_id)
        .bind(reference)
        .bind(stock)
        .execute(&mut **tx)
        .await?;

        Ok(product_id)
    }
}
