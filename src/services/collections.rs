//! Collection management service

use crate::{
    error::{AppError, AppResult},
    models::collection::{Collection, CreateCollection, UpdateCollection},
    repository::Repository,
};

#[derive(Clone)]
pub struct CollectionsService {
    repository: Repository,
}

impl CollectionsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Collection>> {
        self.repository.collections.all().await
    }

    pub async fn get(&self, id: i32) -> AppResult<Collection> {
        self.repository.collections.get(id).await
    }

    pub async fn create(&self, collection: CreateCollection) -> AppResult<Collection> {
        if self
            .repository
            .collections
            .find_by_name(&collection.name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "A collection with this name already exists".to_string(),
            ));
        }
        self.repository.collections.create(&collection).await
    }

    pub async fn update(&self, id: i32, collection: UpdateCollection) -> AppResult<Collection> {
        if let Some(name) = collection.name.as_deref() {
            if let Some(existing) = self.repository.collections.find_by_name(name).await? {
                if existing.id != id {
                    return Err(AppError::Conflict(
                        "A collection with this name already exists".to_string(),
                    ));
                }
            }
        }
        self.repository.collections.update(id, &collection).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.collections.delete(id).await
    }

    /// Mark a collection as the single active import/display target
    pub async fn activate(&self, id: i32) -> AppResult<Collection> {
        self.repository.collections.activate(id).await
    }
}
