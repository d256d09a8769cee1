//! Collection endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::collection::{Collection, CreateCollection, UpdateCollection},
};

use super::AuthenticatedUser;

/// List all collections
#[utoipa::path(
    get,
    path = "/collections",
    tag = "collections",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of collections", body = [Collection])
    )
)]
pub async fn list_collections(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Collection>>> {
    claims.require_read_catalog()?;

    let collections = state.services.collections.list().await?;
    Ok(Json(collections))
}

/// Get a collection by ID
#[utoipa::path(
    get,
    path = "/collections/{id}",
    tag = "collections",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Collection ID")),
    responses(
        (status = 200, description = "Collection details", body = Collection),
        (status = 404, description = "Collection not found")
    )
)]
pub async fn get_collection(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Collection>> {
    claims.require_read_catalog()?;

    let collection = state.services.collections.get(id).await?;
    Ok(Json(collection))
}

/// Create a collection
#[utoipa::path(
    post,
    path = "/collections",
    tag = "collections",
    security(("bearer_auth" = [])),
    request_body = CreateCollection,
    responses(
        (status = 201, description = "Collection created", body = Collection),
        (status = 409, description = "Collection name already exists")
    )
)]
pub async fn create_collection(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(collection): Json<CreateCollection>,
) -> AppResult<(StatusCode, Json<Collection>)> {
    claims.require_write_catalog()?;
    collection
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.collections.create(collection).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a collection
#[utoipa::path(
    put,
    path = "/collections/{id}",
    tag = "collections",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Collection ID")),
    request_body = UpdateCollection,
    responses(
        (status = 200, description = "Collection updated", body = Collection),
        (status = 404, description = "Collection not found")
    )
)]
pub async fn update_collection(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(collection): Json<UpdateCollection>,
) -> AppResult<Json<Collection>> {
    claims.require_write_catalog()?;
    collection
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state.services.collections.update(id, collection).await?;
    Ok(Json(updated))
}

/// Delete a collection
#[utoipa::path(
    delete,
    path = "/collections/{id}",
    tag = "collections",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Collection ID")),
    responses(
        (status = 204, description = "Collection deleted"),
        (status = 404, description = "Collection not found")
    )
)]
pub async fn delete_collection(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_write_catalog()?;

    state.services.collections.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark a collection as the active import/display target
#[utoipa::path(
    post,
    path = "/collections/{id}/activate",
    tag = "collections",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Collection ID")),
    responses(
        (status = 200, description = "Collection activated", body = Collection),
        (status = 404, description = "Collection not found")
    )
)]
pub async fn activate_collection(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Collection>> {
    claims.require_write_catalog()?;

    let activated = state.services.collections.activate(id).await?;
    Ok(Json(activated))
}
