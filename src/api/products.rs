//! Product (catalog) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::product::{
        CreateProduct, CreateVariant, Product, ProductQuery, ProductShort, UpdateProduct,
        UpdateVariantStock, Variant,
    },
};

use super::AuthenticatedUser;

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// List of items
    pub items: Vec<T>,
    /// Total number of items
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
}

/// List products with search and pagination
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    security(("bearer_auth" = [])),
    params(ProductQuery),
    responses(
        (status = 200, description = "List of products", body = PaginatedResponse<ProductShort>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_products(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<PaginatedResponse<ProductShort>>> {
    claims.require_read_catalog()?;

    let (items, total) = state.services.catalog.search_products(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// Get product details by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Product>> {
    claims.require_read_catalog()?;

    let product = state.services.catalog.get_product(id).await?;
    Ok(Json(product))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    security(("bearer_auth" = [])),
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Product reference already exists")
    )
)]
pub async fn create_product(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(product): Json<CreateProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    claims.require_write_catalog()?;
    product
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.catalog.create_product(product).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing product
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(product): Json<UpdateProduct>,
) -> AppResult<Json<Product>> {
    claims.require_write_catalog()?;
    product
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state.services.catalog.update_product(id, product).await?;
    Ok(Json(updated))
}

/// Archive a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product archived"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_write_catalog()?;

    state.services.catalog.archive_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List variants of a product
#[utoipa::path(
    get,
    path = "/products/{id}/variants",
    tag = "products",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Variants of the product", body = [Variant]),
        (status = 404, description = "Product not found")
    )
)]
pub async fn list_variants(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Variant>>> {
    claims.require_read_catalog()?;

    let variants = state.services.catalog.get_variants(id).await?;
    Ok(Json(variants))
}

/// Create a variant under a product
#[utoipa::path(
    post,
    path = "/products/{id}/variants",
    tag = "products",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    request_body = CreateVariant,
    responses(
        (status = 201, description = "Variant created", body = Variant),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Sku already exists")
    )
)]
pub async fn create_variant(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(variant): Json<CreateVariant>,
) -> AppResult<(StatusCode, Json<Variant>)> {
    claims.require_write_catalog()?;
    variant
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.catalog.create_variant(id, variant).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a variant's stock
#[utoipa::path(
    put,
    path = "/products/{id}/variants/{variant_id}/stock",
    tag = "products",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Product ID"),
        ("variant_id" = i32, Path, description = "Variant ID")
    ),
    request_body = UpdateVariantStock,
    responses(
        (status = 200, description = "Variant updated", body = Variant),
        (status = 404, description = "Variant not found")
    )
)]
pub async fn update_variant_stock(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, variant_id)): Path<(i32, i32)>,
    Json(body): Json<UpdateVariantStock>,
) -> AppResult<Json<Variant>> {
    claims.require_write_catalog()?;
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state
        .services
        .catalog
        .update_variant_stock(id, variant_id, body.stock)
        .await?;
    Ok(Json(updated))
}
