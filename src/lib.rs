//! Comptoir Retail Catalog Administration Server
//!
//! A Rust implementation of the Comptoir catalog back office, providing a REST
//! JSON API for managing products, variants, collections and bulk catalog
//! imports with a mandatory preview step.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
