//! Collections repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::collection::{Collection, CreateCollection, UpdateCollection},
};

const COLLECTION_COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct CollectionsRepository {
    pool: Pool<Postgres>,
}

impl CollectionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn all(&self) -> AppResult<Vec<Collection>> {
        Ok(sqlx::query_as::<_, Collection>(&format!(
            "SELECT {} FROM collections ORDER BY name",
            COLLECTION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn get(&self, id: i32) -> AppResult<Collection> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Collection {} not found", id)))
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Collection>> {
        Ok(sqlx::query_as::<_, Collection>(&format!(
            "SELECT {} FROM collections WHERE id = $1",
            COLLECTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Collection>> {
        Ok(sqlx::query_as::<_, Collection>(&format!(
            "SELECT {} FROM collections WHERE LOWER(name) = LOWER($1)",
            COLLECTION_COLUMNS
        ))
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?)
    }

    /// The single collection currently marked as the default import target
    pub async fn find_active(&self) -> AppResult<Option<Collection>> {
        Ok(sqlx::query_as::<_, Collection>(&format!(
            "SELECT {} FROM collections WHERE is_active",
            COLLECTION_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await?)
    }

    pub async fn create(&self, collection: &CreateCollection) -> AppResult<Collection> {
        Ok(sqlx::query_as::<_, Collection>(&format!(
            "INSERT INTO collections (name, description) VALUES ($1, $2) RETURNING {}",
            COLLECTION_COLUMNS
        ))
        .bind(collection.name.trim())
        .bind(&collection.description)
        .fetch_one(&self.pool)
        .await?)
    }

    pub async fn update(&self, id: i32, collection: &UpdateCollection) -> AppResult<Collection> {
        sqlx::query_as::<_, Collection>(&format!(
            r#"
            UPDATE collections SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = now()
            WHERE id = $1
            RETURNING {}
            "#,
            COLLECTION_COLUMNS
        ))
        .bind(id)
        .bind(&collection.name)
        .bind(&collection.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Collection {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Collection {} not found", id)));
        }
        Ok(())
    }

    /// Make this collection the single active one
    pub async fn activate(&self, id: i32) -> AppResult<Collection> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE collections SET is_active = FALSE, updated_at = now() WHERE is_active")
            .execute(&mut *tx)
            .await?;

        let activated = sqlx::query_as::<_, Collection>(&format!(
            "UPDATE collections SET is_active = TRUE, updated_at = now() WHERE id = $1 RETURNING {}",
            COLLECTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Collection {} not found", id)))?;

        tx.commit().await?;
        Ok(activated)
    }
}
