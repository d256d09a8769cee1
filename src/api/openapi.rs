//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{collections, health, imports, products, taxonomy};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Comptoir API",
        version = "1.0.0",
        description = "Retail Catalog Administration REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Comptoir Team", email = "dev@comptoir.example")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Products
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        products::list_variants,
        products::create_variant,
        products::update_variant_stock,
        // Collections
        collections::list_collections,
        collections::get_collection,
        collections::create_collection,
        collections::update_collection,
        collections::delete_collection,
        collections::activate_collection,
        // Taxonomy
        taxonomy::list_brands,
        taxonomy::list_categories,
        // Imports
        imports::preview_import,
        imports::execute_import,
        imports::paste_import,
    ),
    components(
        schemas(
            // Products
            crate::models::product::Product,
            crate::models::product::ProductShort,
            crate::models::product::Variant,
            crate::models::product::ProductQuery,
            crate::models::product::CreateProduct,
            crate::models::product::UpdateProduct,
            crate::models::product::CreateVariant,
            crate::models::product::UpdateVariantStock,
            // Collections
            crate::models::collection::Collection,
            crate::models::collection::CreateCollection,
            crate::models::collection::UpdateCollection,
            // Taxonomy
            crate::models::taxonomy::Brand,
            crate::models::taxonomy::Category,
            // Imports
            crate::models::import::ParsedRow,
            crate::models::import::FullRow,
            crate::models::import::StockRow,
            crate::models::import::RowValidation,
            crate::models::import::ImportPreview,
            crate::models::import::ImportResult,
            crate::models::import::PreviewResponse,
            crate::models::import::PasteRowError,
            crate::models::import::PasteImportResult,
            imports::ExecuteImportRequest,
            imports::PasteImportRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "products", description = "Product and variant management"),
        (name = "collections", description = "Collection management"),
        (name = "taxonomy", description = "Brand and category pick-lists"),
        (name = "imports", description = "Bulk catalog import with preview")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
