//! Import preview assembly
//!
//! Pure aggregation of the upstream stages into an immutable preview. No
//! catalog access happens here; the only reads were the matcher's existence
//! checks. Two calls with identical input produce identical output.

use crate::models::import::ImportPreview;

use super::matcher::{CollectionRef, ProductMatch};
use super::validator::RowReport;

/// Build the preview from the final report and match set.
///
/// `can_import` is true iff no row carries an error and at least one product
/// group was formed.
pub fn build_preview(
    total_rows: usize,
    report: RowReport,
    matches: &[ProductMatch],
    collection: Option<&CollectionRef>,
) -> ImportPreview {
    let validations = report.into_validations();
    let errors: Vec<_> = validations
        .iter()
        .filter(|v| !v.errors.is_empty())
        .cloned()
        .collect();
    let warnings: Vec<_> = validations
        .iter()
        .filter(|v| !v.warnings.is_empty())
        .cloned()
        .collect();

    let product_count = matches.len();
    let variant_count = matches.iter().map(|m| m.variants.len()).sum();
    let can_import = errors.is_empty() && product_count > 0;

    ImportPreview {
        total_rows,
        product_count,
        variant_count,
        errors,
        warnings,
        can_import,
        collection_id: collection.map(|c| c.id),
        collection_name: collection.map(|c| c.name.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::grouper::group_rows;
    use crate::import::matcher::{match_groups, MockCatalogLookup};
    use crate::import::validator::{validate_rows, RowReport, TaxonomyIndex};
    use crate::models::import::{FullRow, ParsedRow};

    fn scenario_rows() -> Vec<ParsedRow> {
        let base = FullRow {
            column_count: 14,
            name: "Tee".to_string(),
            reference: Some("T1".to_string()),
            price: "29.90".to_string(),
            category: "tops".to_string(),
            color: "Black".to_string(),
            ..Default::default()
        };
        vec![
            ParsedRow::Full(FullRow {
                line: 1,
                size: "M".to_string(),
                stock: "5".to_string(),
                sku: "T1-BLK-M".to_string(),
                ..base.clone()
            }),
            ParsedRow::Full(FullRow {
                line: 2,
                size: "L".to_string(),
                stock: "3".to_string(),
                sku: "T1-BLK-L".to_string(),
                ..base
            }),
        ]
    }

    fn empty_catalog() -> MockCatalogLookup {
        let mut catalog = MockCatalogLookup::new();
        catalog
            .expect_find_product_by_reference()
            .returning(|_| Ok(None));
        catalog
            .expect_find_product_by_name()
            .returning(|_| Ok(None));
        catalog.expect_find_variant_by_sku().returning(|_| Ok(None));
        catalog
    }

    fn taxonomy() -> TaxonomyIndex {
        TaxonomyIndex::new(vec!["tops".to_string()], vec![])
    }

    async fn preview_of(rows: &[ParsedRow]) -> ImportPreview {
        let mut report = RowReport::new();
        validate_rows(rows, &taxonomy(), &mut report);
        let groups = group_rows(rows, &mut report);
        let matches = match_groups(groups, &empty_catalog()).await.unwrap();
        build_preview(rows.len(), report, &matches, None)
    }

    #[tokio::test]
    async fn test_two_variant_rows_preview_one_product() {
        // One product, two variants, clean rows: importable.
        let preview = preview_of(&scenario_rows()).await;
        assert_eq!(preview.total_rows, 2);
        assert_eq!(preview.product_count, 1);
        assert_eq!(preview.variant_count, 2);
        assert!(preview.errors.is_empty());
        assert!(preview.can_import);
    }

    #[tokio::test]
    async fn test_one_bad_row_blocks_the_import() {
        let mut rows = scenario_rows();
        if let ParsedRow::Full(r) = &mut rows[1] {
            r.name = String::new();
            r.reference = None;
        }
        let preview = preview_of(&rows).await;
        assert!(!preview.can_import);
        assert_eq!(preview.errors.len(), 1);
        assert_eq!(preview.errors[0].row, 2);
        // The good row still previews.
        assert_eq!(preview.product_count, 1);
        assert_eq!(preview.variant_count, 1);
    }

    #[tokio::test]
    async fn test_warnings_do_not_block() {
        let mut rows = scenario_rows();
        if let ParsedRow::Full(r) = &mut rows[0] {
            r.category = "gadgets".to_string();
        }
        let preview = preview_of(&rows).await;
        assert!(preview.can_import);
        assert_eq!(preview.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_input_cannot_import() {
        let preview = preview_of(&[]).await;
        assert_eq!(preview.product_count, 0);
        assert!(!preview.can_import);
    }

    #[tokio::test]
    async fn test_preview_is_deterministic() {
        let rows = scenario_rows();
        let a = preview_of(&rows).await;
        let b = preview_of(&rows).await;
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_collection_is_reported() {
        let rows = scenario_rows();
        let mut report = RowReport::new();
        validate_rows(&rows, &taxonomy(), &mut report);
        let groups = group_rows(&rows, &mut report);
        let matches = match_groups(groups, &empty_catalog()).await.unwrap();
        let collection = CollectionRef {
            id: 4,
            name: "Summer".to_string(),
        };
        let preview = build_preview(rows.len(), report, &matches, Some(&collection));
        assert_eq!(preview.collection_id, Some(4));
        assert_eq!(preview.collection_name.as_deref(), Some("Summer"));
    }
}
