//! Product grouping
//!
//! Folds validated rows into a hierarchy of products owning variants. Rows
//! that the validator blocked are skipped; warned rows proceed. Groups come
//! out in first-appearance order of their key, which is what guarantees that
//! preview and execute enumerate identically for the same input.
//!
//! Conflict policy, stated explicitly rather than left to iteration order:
//! product-level attributes are first-non-empty-value-wins, and a later
//! conflicting value is a warning. A duplicate variant key inside one group is
//! a stock-merge (last stock value wins, with a warning naming both rows). A
//! sku reused across different groups is an error on the later row.

use std::collections::HashMap;

use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::models::import::{FullRow, ParsedRow};

use super::validator::{parse_price, parse_stock, RowReport};

/// One reconstructed variant (color/size/stock/sku) from a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedVariant {
    /// Row that contributed this variant
    pub row: usize,
    pub color: String,
    pub size: String,
    pub sku: String,
    pub stock: i32,
}

/// One reconstructed product with its variants
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedProduct {
    /// First row that contributed to this group
    pub first_row: usize,
    pub name: String,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub materials: Option<String>,
    pub care_instructions: Option<String>,
    pub made_in: Option<String>,
    pub variants: Vec<GroupedVariant>,
}

fn norm(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Key identifying one logical product within a batch
type GroupKey = (String, String);

fn group_key(row: &FullRow) -> GroupKey {
    (norm(&row.name), norm(row.reference.as_deref().unwrap_or("")))
}

/// Key identifying one variant within a group: sku when present, else
/// color+size.
fn variant_key(row: &FullRow) -> (String, String) {
    let sku = norm(&row.sku);
    if sku.is_empty() {
        (norm(&row.color), norm(&row.size))
    } else {
        (sku, String::new())
    }
}

/// First-non-empty-value-wins merge of a product-level attribute. A later,
/// different, non-empty value is a warning; the kept value never changes once
/// set.
fn merge_attr(
    slot: &mut Option<String>,
    later: Option<&str>,
    field: &str,
    product: &str,
    row: usize,
    report: &mut RowReport,
) {
    let later = match later.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v,
        None => return,
    };
    match slot {
        None => *slot = Some(later.to_string()),
        Some(kept) if kept != later => report.warning(
            row,
            format!(
                "conflicting {} for product '{}', first value kept",
                field, product
            ),
        ),
        Some(_) => {}
    }
}

/// Fold rows into grouped products, in first-appearance order.
///
/// Only full-schema rows participate; stock-schema rows go through the paste
/// pipeline, which has no grouping.
pub fn group_rows(rows: &[ParsedRow], report: &mut RowReport) -> Vec<GroupedProduct> {
    let mut groups: IndexMap<GroupKey, GroupedProduct> = IndexMap::new();
    // sku -> (owning group key, row that introduced it)
    let mut sku_owner: HashMap<String, (GroupKey, usize)> = HashMap::new();

    for parsed in rows {
        let row = match parsed {
            ParsedRow::Full(r) => r,
            ParsedRow::Stock(_) => continue,
        };
        if report.is_blocked(row.line) {
            continue;
        }

        let key = group_key(row);
        let sku = norm(&row.sku);

        if !sku.is_empty() {
            if let Some((owner_key, owner_row)) = sku_owner.get(&sku) {
                if *owner_key != key {
                    report.error(
                        row.line,
                        format!(
                            "duplicate sku '{}' already used at row {}",
                            row.sku.trim(),
                            owner_row
                        ),
                    );
                    continue;
                }
            }
        }

        let stock = parse_stock(&row.stock).unwrap_or(0);
        let price = parse_price(&row.price).ok().flatten();

        let group = groups.entry(key.clone()).or_insert_with(|| GroupedProduct {
            first_row: row.line,
            name: row.name.trim().to_string(),
            reference: row.reference.as_deref().map(|r| r.trim().to_string()),
            description: None,
            price: price.unwrap_or_default(),
            brand: None,
            category: None,
            materials: None,
            care_instructions: None,
            made_in: None,
            variants: Vec::new(),
        });

        if group.first_row != row.line {
            if let Some(p) = price {
                if p != group.price {
                    report.warning(
                        row.line,
                        format!(
                            "conflicting price for product '{}', first value kept",
                            group.name
                        ),
                    );
                }
            }
        }
        let name = group.name.clone();
        merge_attr(
            &mut group.description,
            row.description.as_deref(),
            "description",
            &name,
            row.line,
            report,
        );
        merge_attr(&mut group.brand, row.brand.as_deref(), "brand", &name, row.line, report);
        merge_attr(
            &mut group.category,
            Some(row.category.as_str()),
            "category",
            &name,
            row.line,
            report,
        );
        merge_attr(
            &mut group.materials,
            row.materials.as_deref(),
            "materials",
            &name,
            row.line,
            report,
        );
        merge_attr(
            &mut group.care_instructions,
            row.care_instructions.as_deref(),
            "care instructions",
            &name,
            row.line,
            report,
        );
        merge_attr(
            &mut group.made_in,
            row.made_in.as_deref(),
            "made-in",
            &name,
            row.line,
            report,
        );

        let vkey = variant_key(row);
        if let Some(existing) = group
            .variants
            .iter_mut()
            .find(|v| variant_key_of(v) == vkey)
        {
            // Stock-merge: last value wins, both rows surfaced to the operator.
            report.warning(
                row.line,
                format!(
                    "duplicate variant within file (rows {} and {}), last value kept",
                    existing.row, row.line
                ),
            );
            existing.stock = stock;
        } else {
            group.variants.push(GroupedVariant {
                row: row.line,
                color: row.color.trim().to_string(),
                size: row.size.trim().to_string(),
                sku: row.sku.trim().to_string(),
                stock,
            });
            if !sku.is_empty() {
                sku_owner.insert(sku, (key, row.line));
            }
        }
    }

    groups.into_values().collect()
}

fn variant_key_of(variant: &GroupedVariant) -> (String, String) {
    let sku = norm(&variant.sku);
    if sku.is_empty() {
        (norm(&variant.color), norm(&variant.size))
    } else {
        (sku, String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::validator::{validate_rows, TaxonomyIndex};
    use crate::models::import::FullRow;

    fn row(line: usize, name: &str, reference: &str, color: &str, size: &str, stock: &str, sku: &str) -> ParsedRow {
        ParsedRow::Full(FullRow {
            line,
            column_count: 14,
            name: name.to_string(),
            reference: Some(reference.to_string()).filter(|r| !r.is_empty()),
            price: "29.90".to_string(),
            category: "tops".to_string(),
            color: color.to_string(),
            size: size.to_string(),
            stock: stock.to_string(),
            sku: sku.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_groups_share_product_key() {
        let rows = vec![
            row(1, "Tee", "T1", "Black", "M", "5", "T1-BLK-M"),
            row(2, "Tee", "T1", "Black", "L", "3", "T1-BLK-L"),
        ];
        let mut report = RowReport::new();
        let groups = group_rows(&rows, &mut report);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].variants.len(), 2);
        assert_eq!(groups[0].first_row, 1);
        assert!(report.into_validations().is_empty());
    }

    #[test]
    fn test_reference_key_is_case_insensitive() {
        let rows = vec![
            row(1, "Tee", "T1", "Black", "M", "5", "T1-BLK-M"),
            row(2, "tee", "t1", "Black", "L", "3", "T1-BLK-L"),
        ];
        let mut report = RowReport::new();
        let groups = group_rows(&rows, &mut report);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_first_appearance_order_is_preserved() {
        let rows = vec![
            row(1, "Zeta", "Z1", "Black", "M", "1", "Z1-M"),
            row(2, "Alpha", "A1", "Black", "M", "1", "A1-M"),
            row(3, "Zeta", "Z1", "Black", "L", "1", "Z1-L"),
        ];
        let mut report = RowReport::new();
        let groups = group_rows(&rows, &mut report);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_blocked_rows_are_excluded() {
        let rows = vec![
            row(1, "Tee", "T1", "Black", "M", "5", "T1-BLK-M"),
            row(2, "", "T2", "Black", "M", "5", "T2-BLK-M"),
        ];
        let mut report = RowReport::new();
        validate_rows(&rows, &TaxonomyIndex::default(), &mut report);
        let groups = group_rows(&rows, &mut report);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Tee");
    }

    #[test]
    fn test_conflicting_product_attribute_warns_first_wins() {
        let mut first = match row(1, "Tee", "T1", "Black", "M", "5", "T1-BLK-M") {
            ParsedRow::Full(r) => r,
            _ => unreachable!(),
        };
        first.description = Some("Basic tee".to_string());
        let mut second = match row(2, "Tee", "T1", "Black", "L", "3", "T1-BLK-L") {
            ParsedRow::Full(r) => r,
            _ => unreachable!(),
        };
        second.description = Some("Premium tee".to_string());

        let rows = vec![ParsedRow::Full(first), ParsedRow::Full(second)];
        let mut report = RowReport::new();
        let groups = group_rows(&rows, &mut report);
        assert_eq!(groups[0].description.as_deref(), Some("Basic tee"));
        let validations = report.into_validations();
        assert_eq!(validations.len(), 1);
        assert_eq!(validations[0].row, 2);
        assert!(validations[0].warnings[0].contains("conflicting description"));
    }

    #[test]
    fn test_blank_later_attribute_is_not_a_conflict() {
        let mut first = match row(1, "Tee", "T1", "Black", "M", "5", "T1-BLK-M") {
            ParsedRow::Full(r) => r,
            _ => unreachable!(),
        };
        first.brand = Some("Acme".to_string());
        let second = row(2, "Tee", "T1", "Black", "L", "3", "T1-BLK-L");

        let rows = vec![ParsedRow::Full(first), second];
        let mut report = RowReport::new();
        let groups = group_rows(&rows, &mut report);
        assert_eq!(groups[0].brand.as_deref(), Some("Acme"));
        assert!(report.into_validations().is_empty());
    }

    #[test]
    fn test_duplicate_variant_in_group_merges_stock() {
        let rows = vec![
            row(1, "Tee", "T1", "Black", "M", "5", "T1-BLK-M"),
            row(2, "Tee", "T1", "Black", "M", "9", "T1-BLK-M"),
        ];
        let mut report = RowReport::new();
        let groups = group_rows(&rows, &mut report);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].variants.len(), 1);
        assert_eq!(groups[0].variants[0].stock, 9);

        let validations = report.into_validations();
        assert!(!report_has_errors(&validations));
        assert_eq!(
            validations[0].warnings,
            vec!["duplicate variant within file (rows 1 and 2), last value kept"]
        );
    }

    #[test]
    fn test_duplicate_sku_across_groups_is_an_error_on_later_row() {
        let rows = vec![
            row(1, "Tee", "T1", "Black", "M", "5", "SKU-1"),
            row(2, "Hoodie", "H1", "Black", "M", "5", "SKU-1"),
        ];
        let mut report = RowReport::new();
        let groups = group_rows(&rows, &mut report);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Tee");

        let validations = report.into_validations();
        assert_eq!(validations.len(), 1);
        assert_eq!(validations[0].row, 2);
        assert_eq!(
            validations[0].errors,
            vec!["duplicate sku 'SKU-1' already used at row 1"]
        );
    }

    fn report_has_errors(validations: &[crate::models::import::RowValidation]) -> bool {
        validations.iter().any(|v| !v.errors.is_empty())
    }
}
