//! Brand and category taxonomy service

use crate::{
    error::AppResult,
    models::taxonomy::{Brand, Category},
    repository::Repository,
};

#[derive(Clone)]
pub struct TaxonomyService {
    repository: Repository,
}

impl TaxonomyService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_brands(&self) -> AppResult<Vec<Brand>> {
        self.repository.taxonomy.brands_all().await
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repository.taxonomy.categories_all().await
    }
}
