//! Per-row validation rules
//!
//! Validation is pure and side-effect-free: every rule is evaluated on one row
//! at a time against a pre-loaded taxonomy snapshot, and failures accumulate
//! into a [`RowReport`] keyed by the row's original position. Errors block a
//! row from grouping and block the whole import; warnings never block.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::models::import::{FullRow, ParsedRow, RowValidation, StockRow};

use super::parser::{FULL_COLUMN_COUNT, STOCK_COLUMN_COUNT};

fn norm(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Snapshot of the known taxonomy, loaded once per import operation so the
/// validator never touches the catalog mid-pipeline.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyIndex {
    categories: HashSet<String>,
    collections: HashMap<String, (i32, String)>,
}

impl TaxonomyIndex {
    pub fn new(
        categories: impl IntoIterator<Item = String>,
        collections: impl IntoIterator<Item = (i32, String)>,
    ) -> Self {
        Self {
            categories: categories.into_iter().map(|c| norm(&c)).collect(),
            collections: collections
                .into_iter()
                .map(|(id, name)| (norm(&name), (id, name)))
                .collect(),
        }
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.contains(&norm(name))
    }

    pub fn resolve_collection(&self, name: &str) -> Option<(i32, String)> {
        self.collections.get(&norm(name)).cloned()
    }
}

/// Accumulator for per-row error and warning messages, ordered by row number.
///
/// Both the validator and the grouper write into the same report; the preview
/// builder and the executor read the final state.
#[derive(Debug, Default)]
pub struct RowReport {
    rows: BTreeMap<usize, RowValidation>,
}

impl RowReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, row: usize, message: impl Into<String>) {
        self.entry(row).errors.push(message.into());
    }

    pub fn warning(&mut self, row: usize, message: impl Into<String>) {
        self.entry(row).warnings.push(message.into());
    }

    fn entry(&mut self, row: usize) -> &mut RowValidation {
        self.rows.entry(row).or_insert_with(|| RowValidation {
            row,
            ..Default::default()
        })
    }

    /// True if the given row has at least one blocking error.
    pub fn is_blocked(&self, row: usize) -> bool {
        self.rows.get(&row).is_some_and(|v| !v.errors.is_empty())
    }

    /// True if any row has a blocking error.
    pub fn has_errors(&self) -> bool {
        self.rows.values().any(|v| !v.errors.is_empty())
    }

    /// All rows with messages, in ascending row order.
    pub fn into_validations(self) -> Vec<RowValidation> {
        self.rows.into_values().collect()
    }
}

/// Parse a price field. `Ok(None)` means empty input.
pub(super) fn parse_price(value: &str) -> Result<Option<Decimal>, ()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(trimmed).map(Some).map_err(|_| ())
}

/// Parse a stock field as a non-negative integer.
pub(super) fn parse_stock(value: &str) -> Result<i32, ()> {
    match value.trim().parse::<i32>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(()),
    }
}

/// Run every per-row rule over the parsed rows, appending to `report`.
pub fn validate_rows(rows: &[ParsedRow], taxonomy: &TaxonomyIndex, report: &mut RowReport) {
    for row in rows {
        match row {
            ParsedRow::Full(r) => validate_full(r, taxonomy, report),
            ParsedRow::Stock(r) => validate_stock(r, report),
        }
    }
}

fn validate_full(row: &FullRow, taxonomy: &TaxonomyIndex, report: &mut RowReport) {
    let line = row.line;

    if row.column_count != FULL_COLUMN_COUNT {
        report.error(
            line,
            format!(
                "expected {} columns, found {}",
                FULL_COLUMN_COUNT, row.column_count
            ),
        );
    }

    if row.name.trim().is_empty() {
        report.error(line, "name is required");
    }

    match parse_price(&row.price) {
        Ok(Some(price)) if price.is_sign_negative() => {
            report.error(line, "price must be non-negative");
        }
        Ok(Some(price)) if price.is_zero() => {
            report.warning(line, "price is zero");
        }
        Ok(Some(_)) => {}
        Ok(None) | Err(()) => {
            report.error(
                line,
                format!("price must be a non-negative decimal, got '{}'", row.price),
            );
        }
    }

    if parse_stock(&row.stock).is_err() {
        report.error(
            line,
            format!("stock must be a non-negative integer, got '{}'", row.stock),
        );
    }

    if row.sku.trim().is_empty() {
        report.error(line, "sku is required");
    }

    if row.color.trim().is_empty() {
        report.error(line, "color is required");
    }

    if row.size.trim().is_empty() {
        report.error(line, "size is required");
    }

    if row.category.trim().is_empty() {
        report.error(line, "category is required");
    } else if !taxonomy.has_category(&row.category) {
        report.warning(
            line,
            format!("category '{}' will need manual mapping", row.category.trim()),
        );
    }

    if let Some(collection) = row.collection.as_deref() {
        if !collection.trim().is_empty() && taxonomy.resolve_collection(collection).is_none() {
            report.warning(
                line,
                format!(
                    "unknown collection '{}', the default collection will be used",
                    collection.trim()
                ),
            );
        }
    }
}

fn validate_stock(row: &StockRow, report: &mut RowReport) {
    let line = row.line;

    if row.column_count != STOCK_COLUMN_COUNT {
        report.error(
            line,
            format!(
                "expected {} columns, found {}",
                STOCK_COLUMN_COUNT, row.column_count
            ),
        );
    }

    if row.reference.trim().is_empty() {
        report.error(line, "reference is required");
    }

    if parse_stock(&row.stock).is_err() {
        report.error(
            line,
            format!("stock must be a non-negative integer, got '{}'", row.stock),
        );
    }
}
