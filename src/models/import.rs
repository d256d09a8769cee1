//! Wire-level types for the collection import pipeline
//!
//! Everything here is transient and request-scoped: rows and previews are
//! returned to the client and resubmitted for execution, never persisted.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One parsed line of tabular input, tagged with its schema.
///
/// The two schemas are distinct types behind one sum type so the validator can
/// be exhaustive and the two pipelines (full import vs. paste stock import)
/// share primitives without sharing row shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "schema", rename_all = "snake_case")]
pub enum ParsedRow {
    Full(FullRow),
    Stock(StockRow),
}

impl ParsedRow {
    /// 1-based position in the original input, header excluded
    pub fn line(&self) -> usize {
        match self {
            ParsedRow::Full(r) => r.line,
            ParsedRow::Stock(r) => r.line,
        }
    }
}

/// A row of the 14-column full product schema. Field values are kept as
/// entered; parsing of price/stock happens in the validator so the offending
/// text can be reported back verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FullRow {
    /// 1-based data line number (header excluded)
    pub line: usize,
    /// Number of fields found on this line; mismatches become validator errors
    pub column_count: usize,
    pub name: String,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub price: String,
    pub brand: Option<String>,
    pub category: String,
    pub collection: Option<String>,
    pub color: String,
    pub size: String,
    pub stock: String,
    pub sku: String,
    pub materials: Option<String>,
    pub care_instructions: Option<String>,
    pub made_in: Option<String>,
}

/// A row of the 4-column pasted stock schema (Marque / Genre / Reference /
/// Stock). Only adjusts or seeds stock by reference; never creates taxonomy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StockRow {
    pub line: usize,
    pub column_count: usize,
    pub brand: String,
    pub category: String,
    pub reference: String,
    pub stock: String,
}

/// Validation outcome for one row: the accumulated error and warning messages
/// keyed by the row's original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RowValidation {
    /// 1-based row number in the original input
    pub row: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Dry-run summary of an import: what would happen, and whether it may proceed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportPreview {
    pub total_rows: usize,
    pub product_count: usize,
    pub variant_count: usize,
    /// Rows with at least one blocking error, in row order
    pub errors: Vec<RowValidation>,
    /// Rows with at least one warning, in row order
    pub warnings: Vec<RowValidation>,
    pub can_import: bool,
    pub collection_id: Option<i32>,
    pub collection_name: Option<String>,
}

/// Outcome of an executed import batch. `errors` are execution-time failures
/// (constraint violations and the like); rows that succeeded stay committed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportResult {
    pub products_created: usize,
    pub products_updated: usize,
    pub variants_created: usize,
    pub variants_updated: usize,
    pub errors: Vec<String>,
}

/// Response of the preview operation: the parsed rows (to be resubmitted for
/// execution) and the dry-run summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PreviewResponse {
    pub rows: Vec<ParsedRow>,
    pub preview: ImportPreview,
}

/// Per-row failure from the paste stock import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PasteRowError {
    pub row: usize,
    pub message: String,
}

/// Outcome of a paste stock import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PasteImportResult {
    pub created: usize,
    pub updated: usize,
    pub errors: Vec<PasteRowError>,
}
