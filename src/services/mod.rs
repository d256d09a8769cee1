//! Business logic services

pub mod catalog;
pub mod collections;
pub mod imports;
pub mod taxonomy;

use crate::{config::ImportConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub collections: collections::CollectionsService,
    pub taxonomy: taxonomy::TaxonomyService,
    pub imports: imports::ImportService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, import_config: ImportConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            collections: collections::CollectionsService::new(repository.clone()),
            taxonomy: taxonomy::TaxonomyService::new(repository.clone()),
            imports: imports::ImportService::new(repository, import_config),
        }
    }
}
