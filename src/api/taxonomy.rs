//! Brand and category pick-list endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::taxonomy::{Brand, Category},
};

use super::AuthenticatedUser;

/// List all brands
#[utoipa::path(
    get,
    path = "/brands",
    tag = "taxonomy",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of brands", body = [Brand])
    )
)]
pub async fn list_brands(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Brand>>> {
    claims.require_read_catalog()?;

    let brands = state.services.taxonomy.list_brands().await?;
    Ok(Json(brands))
}

/// List all categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "taxonomy",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of categories", body = [Category])
    )
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Category>>> {
    claims.require_read_catalog()?;

    let categories = state.services.taxonomy.list_categories().await?;
    Ok(Json(categories))
}
