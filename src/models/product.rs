//! Product and variant models and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A sellable variant of a product (one color/size combination)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Variant {
    pub id: i32,
    pub product_id: i32,
    pub color: String,
    pub size: String,
    pub sku: String,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full product model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub reference: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub materials: Option<String>,
    pub care_instructions: Option<String>,
    pub made_in: Option<String>,
    pub collection_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
    /// Variants, loaded separately from the variants table
    #[sqlx(skip)]
    #[serde(default)]
    pub variants: Vec<Variant>,
}

/// Compact product representation for list views
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProductShort {
    pub id: i32,
    pub name: String,
    pub reference: Option<String>,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub collection_id: Option<i32>,
    pub variant_count: i64,
    pub total_stock: i64,
}

/// Search/pagination parameters for product listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct ProductQuery {
    pub name: Option<String>,
    pub reference: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub collection_id: Option<i32>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Payload for creating a product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub reference: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub materials: Option<String>,
    pub care_instructions: Option<String>,
    pub made_in: Option<String>,
    pub collection_id: Option<i32>,
}

/// Payload for updating a product. Missing fields keep their current value.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub reference: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub materials: Option<String>,
    pub care_instructions: Option<String>,
    pub made_in: Option<String>,
    pub collection_id: Option<i32>,
}

/// Payload for creating a variant under a product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateVariant {
    pub color: String,
    pub size: String,
    #[validate(length(min = 1, message = "sku is required"))]
    pub sku: String,
    #[validate(range(min = 0, message = "stock must be non-negative"))]
    pub stock: i32,
}

/// Payload for updating a variant's stock
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateVariantStock {
    #[validate(range(min = 0, message = "stock must be non-negative"))]
    pub stock: i32,
}
