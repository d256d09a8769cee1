//! Import orchestration service
//!
//! Preview and execute are independent entry points over the same upstream
//! stages. Preview never writes. Execute re-derives validation, grouping and
//! matching from the submitted rows rather than trusting a client-supplied
//! preview, so a stale preview can never drive a write.

use crate::{
    config::ImportConfig,
    error::{AppError, AppResult},
    import::{
        build_preview, group_rows,
        matcher::{match_groups, resolve_collection, CatalogLookup, MatchAction, ProductMatch},
        parser::{FullRowParser, StockRowParser},
        validator::{validate_rows, RowReport, TaxonomyIndex},
    },
    models::import::{
        ImportResult, ParsedRow, PasteImportResult, PasteRowError, PreviewResponse,
    },
    repository::Repository,
};

/// Counts from writing one product group
#[derive(Debug, Default, Clone, Copy)]
struct GroupCounts {
    products_created: usize,
    products_updated: usize,
    variants_created: usize,
    variants_updated: usize,
}

/// A connectivity-class failure aborts the remaining batch; anything else is a
/// per-group execution error and the batch continues.
fn is_fatal(error: &AppError) -> bool {
    matches!(
        error,
        AppError::Database(sqlx::Error::Io(_))
            | AppError::Database(sqlx::Error::PoolTimedOut)
            | AppError::Database(sqlx::Error::PoolClosed)
    )
}

/// Turn a report with blocking errors into the refusal result: nothing is
/// written, and every blocking message is surfaced with its row number.
fn blocked_result(report: RowReport) -> ImportResult {
    let mut result = ImportResult::default();
    for validation in report.into_validations() {
        for error in &validation.errors {
            result
                .errors
                .push(format!("row {}: {}", validation.row, error));
        }
    }
    result
}

#[derive(Clone)]
pub struct ImportService {
    repository: Repository,
    config: ImportConfig,
}

impl ImportService {
    pub fn new(repository: Repository, config: ImportConfig) -> Self {
        Self { repository, config }
    }

    fn check_row_budget(&self, count: usize) -> AppResult<()> {
        if count > self.config.max_rows {
            return Err(AppError::BadRequest(format!(
                "import exceeds the {} row limit ({} rows)",
                self.config.max_rows, count
            )));
        }
        Ok(())
    }

    async fn taxonomy_index(&self) -> AppResult<TaxonomyIndex> {
        let categories = self.repository.taxonomy.category_names().await?;
        let collections = self
            .repository
            .collections
            .all()
            .await?
            .into_iter()
            .map(|c| (c.id, c.name));
        Ok(TaxonomyIndex::new(categories, collections))
    }

    /// Operation 1 — Preview: dry-run the full pipeline with no side effects.
    pub async fn preview(
        &self,
        text: &str,
        collection_id: Option<i32>,
    ) -> AppResult<PreviewResponse> {
        let rows = FullRowParser::parse(text)?;
        self.check_row_budget(rows.len())?;

        let taxonomy = self.taxonomy_index().await?;
        let mut report = RowReport::new();
        validate_rows(&rows, &taxonomy, &mut report);
        let groups = group_rows(&rows, &mut report);

        let collection = resolve_collection(collection_id, &self.repository).await?;
        let matches = match_groups(groups, &self.repository).await?;
        let preview = build_preview(rows.len(), report, &matches, collection.as_ref());

        tracing::info!(
            rows = preview.total_rows,
            products = preview.product_count,
            variants = preview.variant_count,
            can_import = preview.can_import,
            "import preview built"
        );
        Ok(PreviewResponse { rows, preview })
    }

    /// Operation 2 — Execute: re-validate the submitted rows and write.
    ///
    /// Blocking validation errors refuse the whole batch (a data problem, not
    /// a transport failure). Execution errors are collected per group and the
    /// batch continues; only persistence unavailability aborts.
    pub async fn execute(
        &self,
        rows: Vec<ParsedRow>,
        collection_id: Option<i32>,
    ) -> AppResult<ImportResult> {
        self.check_row_budget(rows.len())?;

        let taxonomy = self.taxonomy_index().await?;
        let mut report = RowReport::new();
        validate_rows(&rows, &taxonomy, &mut report);
        let groups = group_rows(&rows, &mut report);

        if report.has_errors() {
            let result = blocked_result(report);
            tracing::warn!(errors = result.errors.len(), "import refused by re-validation");
            return Ok(result);
        }

        let collection = resolve_collection(collection_id, &self.repository).await?;
        let matches = match_groups(groups, &self.repository).await?;

        let mut result = ImportResult::default();
        for product_match in &matches {
            match self.write_group(product_match, collection.as_ref().map(|c| c.id)).await {
                Ok(counts) => {
                    result.products_created += counts.products_created;
                    result.products_updated += counts.products_updated;
                    result.variants_created += counts.variants_created;
                    result.variants_updated += counts.variants_updated;
                }
                Err(error) if is_fatal(&error) => {
                    tracing::error!(
                        "import aborted at product '{}': {}",
                        product_match.product.name,
                        error
                    );
                    return Err(error);
                }
                Err(error) => {
                    result.errors.push(format!(
                        "product '{}' (row {}): {}",
                        product_match.product.name, product_match.product.first_row, error
                    ));
                }
            }
        }

        tracing::info!(
            products_created = result.products_created,
            products_updated = result.products_updated,
            variants_created = result.variants_created,
            variants_updated = result.variants_updated,
            errors = result.errors.len(),
            "import executed"
        );
        Ok(result)
    }

    /// One transaction per product group: the product write and its variant
    /// writes commit or roll back together, independently of other groups.
    ///
    /// A stock update whose value equals the stored one still runs and still
    /// counts as updated, so preview counts always equal execute counts.
    async fn write_group(
        &self,
        product_match: &ProductMatch,
        collection_id: Option<i32>,
    ) -> AppResult<GroupCounts> {
        let mut counts = GroupCounts::default();
        let mut tx = self.repository.pool.begin().await?;
        let products = &self.repository.products;

        let product_id = match product_match.action {
            MatchAction::Create => {
                counts.products_created += 1;
                products
                    .import_create_product(&mut tx, &product_match.product, collection_id)
                    .await?
            }
            MatchAction::Update(id) => {
                counts.products_updated += 1;
                products
                    .import_update_product(&mut tx, id, &product_match.product, collection_id)
                    .await?;
                id
            }
        };

        for variant_match in &product_match.variants {
            match variant_match.action {
                MatchAction::Create => {
                    counts.variants_created += 1;
                    products
                        .import_create_variant(&mut tx, product_id, &variant_match.variant)
                        .await?;
                }
                MatchAction::Update(variant_id) => {
                    counts.variants_updated += 1;
                    products
                        .import_update_variant_stock(&mut tx, variant_id, variant_match.variant.stock)
                        .await?;
                }
            }
        }

        tx.commit().await?;
        Ok(counts)
    }

    /// Operation 3 — Paste import: the reduced pipeline for the 4-column
    /// stock schema. No grouping, no collection logic; per row, an existing
    /// variant (sku = reference) gets its stock updated, otherwise a
    /// placeholder product and variant are seeded.
    pub async fn paste_import(&self, text: &str) -> AppResult<PasteImportResult> {
        let rows = StockRowParser::parse(text)?;
        self.check_row_budget(rows.len())?;

        let mut report = RowReport::new();
        validate_rows(&rows, &TaxonomyIndex::default(), &mut report);

        let mut result = PasteImportResult::default();
        for parsed in &rows {
            let row = match parsed {
                ParsedRow::Stock(r) => r,
                ParsedRow::Full(_) => continue,
            };
            if report.is_blocked(row.line) {
                continue;
            }
            let stock: i32 = row.stock.trim().parse().unwrap_or(0);
            match self.paste_row(&row.reference, &row.brand, &row.category, stock).await {
                Ok(updated) => {
                    if updated {
                        result.updated += 1;
                    } else {
                        result.created += 1;
                    }
                }
                Err(error) if is_fatal(&error) => return Err(error),
                Err(error) => result.errors.push(PasteRowError {
                    row: row.line,
                    message: error.to_string(),
                }),
            }
        }

        // Blocked rows are reported alongside execution failures.
        for validation in report.into_validations() {
            for error in validation.errors {
                result.errors.push(PasteRowError {
                    row: validation.row,
                    message: error,
                });
            }
        }
        result.errors.sort_by_key(|e| e.row);

        tracing::info!(
            created = result.created,
            updated = result.updated,
            errors = result.errors.len(),
            "paste stock import finished"
        );
        Ok(result)
    }

    /// Returns true if an existing variant was updated, false if a placeholder
    /// was created.
    async fn paste_row(
        &self,
        reference: &str,
        brand: &str,
        category: &str,
        stock: i32,
    ) -> AppResult<bool> {
        let reference = reference.trim();
        if let Some(variant_id) = self.repository.find_variant_by_sku(reference).await? {
            self.repository
                .products
                .update_variant_stock(variant_id, stock)
                .await?;
            return Ok(true);
        }

        let mut tx = self.repository.pool.begin().await?;
        self.repository
            .products
            .paste_create_placeholder(
                &mut tx,
                reference,
                Some(brand.trim()).filter(|b| !b.is_empty()),
                Some(category.trim()).filter(|c| !c.is_empty()),
                stock,
            )
            .await?;
        tx.commit().await?;
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_result_lists_every_error_with_its_row() {
        let mut report = RowReport::new();
        report.error(3, "price must be non-negative");
        report.error(3, "sku is required");
        report.warning(1, "price is zero");
        report.error(7, "name is required");

        let result = blocked_result(report);
        assert_eq!(result.products_created, 0);
        assert_eq!(result.variants_created, 0);
        assert_eq!(
            result.errors,
            vec![
                "row 3: price must be non-negative",
                "row 3: sku is required",
                "row 7: name is required",
            ]
        );
    }

    #[test]
    fn test_fatal_errors_are_connectivity_class() {
        assert!(is_fatal(&AppError::Database(sqlx::Error::PoolClosed)));
        assert!(is_fatal(&AppError::Database(sqlx::Error::PoolTimedOut)));
        assert!(!is_fatal(&AppError::Database(sqlx::Error::RowNotFound)));
        assert!(!is_fatal(&AppError::Conflict("duplicate".to_string())));
    }

    #[test]
    fn test_blocked_result_ignores_warning_only_rows() {
        let mut report = RowReport::new();
        report.warning(1, "category 'x' will need manual mapping");
        let result = blocked_result(report);
        assert!(result.errors.is_empty());
    }

    // Keeps the refusal path honest about shape: a refusal is still a
    // well-formed ImportResult, not a transport error.
    #[test]
    fn test_refusal_is_a_zeroed_result() {
        let mut report = RowReport::new();
        report.error(1, "name is required");
        let result = blocked_result(report);
        assert_eq!(
            (
                result.products_created,
                result.products_updated,
                result.variants_created,
                result.variants_updated
            ),
            (0, 0, 0, 0)
        );
    }
}
