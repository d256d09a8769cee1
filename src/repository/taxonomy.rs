//! Brand and category taxonomy repository

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::taxonomy::{Brand, Category},
};

#[derive(Clone)]
pub struct TaxonomyRepository {
    pool: Pool<Postgres>,
}

impl TaxonomyRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn brands_all(&self) -> AppResult<Vec<Brand>> {
        Ok(sqlx::query_as::<_, Brand>(
            "SELECT id, name, created_at, updated_at FROM brands ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn categories_all(&self) -> AppResult<Vec<Category>> {
        Ok(sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at, updated_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// Known category names, for the import validator's taxonomy snapshot
    pub async fn category_names(&self) -> AppResult<Vec<String>> {
        Ok(sqlx::query_scalar("SELECT name FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?)
    }
}
