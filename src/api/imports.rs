//! Collection import endpoints
//!
//! Preview and execute are separate endpoints on purpose: preview is
//! side-effect-free, execute re-validates the resubmitted rows from scratch.
//! Data problems (blocking errors, per-row execution failures) are 2xx with a
//! structured body; 4xx is reserved for malformed requests and 5xx for
//! persistence unavailability.

use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::import::{ImportResult, ParsedRow, PasteImportResult, PreviewResponse},
};

use super::AuthenticatedUser;

/// Body for the execute operation: the rows previously returned by preview,
/// resubmitted as-is
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExecuteImportRequest {
    pub rows: Vec<ParsedRow>,
    pub collection_id: Option<i32>,
}

/// Body for the paste stock import
#[derive(Debug, Deserialize, ToSchema)]
pub struct PasteImportRequest {
    pub text: String,
}

/// Preview a CSV import (dry run, no writes)
///
/// Multipart form: a `file` (or `text`) part with the CSV content, and an
/// optional `collection_id` part with the target collection.
#[utoipa::path(
    post,
    path = "/imports/preview",
    tag = "imports",
    security(("bearer_auth" = [])),
    request_body(content = String, content_type = "multipart/form-data", description = "CSV file or pasted text, optional collection_id"),
    responses(
        (status = 200, description = "Parsed rows and import preview", body = PreviewResponse),
        (status = 400, description = "Missing file or malformed header")
    )
)]
pub async fn preview_import(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    mut multipart: Multipart,
) -> AppResult<Json<PreviewResponse>> {
    claims.require_write_catalog()?;

    let mut text: Option<String> = None;
    let mut collection_id: Option<i32> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Unreadable field '{}': {}", name, e)))?;
        match name.as_str() {
            "file" | "text" => text = Some(value),
            "collection_id" => collection_id = value.trim().parse().ok(),
            _ => {}
        }
    }

    let text = text.ok_or_else(|| {
        AppError::BadRequest("Missing 'file' or 'text' field in multipart body".to_string())
    })?;

    let response = state.services.imports.preview(&text, collection_id).await?;
    Ok(Json(response))
}

/// Execute an import from previously previewed rows
#[utoipa::path(
    post,
    path = "/imports/execute",
    tag = "imports",
    security(("bearer_auth" = [])),
    request_body = ExecuteImportRequest,
    responses(
        (status = 200, description = "Import outcome, including per-group errors", body = ImportResult),
        (status = 400, description = "Malformed request")
    )
)]
pub async fn execute_import(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<ExecuteImportRequest>,
) -> AppResult<Json<ImportResult>> {
    claims.require_write_catalog()?;

    let result = state
        .services
        .imports
        .execute(request.rows, request.collection_id)
        .await?;
    Ok(Json(result))
}

/// Import stock counts from a pasted tab-separated table
#[utoipa::path(
    post,
    path = "/imports/paste",
    tag = "imports",
    security(("bearer_auth" = [])),
    request_body = PasteImportRequest,
    responses(
        (status = 200, description = "Paste import outcome", body = PasteImportResult),
        (status = 400, description = "Malformed request")
    )
)]
pub async fn paste_import(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<PasteImportRequest>,
) -> AppResult<Json<PasteImportResult>> {
    claims.require_write_catalog()?;

    let result = state.services.imports.paste_import(&request.text).await?;
    Ok(Json(result))
}
