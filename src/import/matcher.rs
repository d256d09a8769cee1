//! Catalog matching
//!
//! Resolves grouped products and variants against the existing catalog to
//! decide create vs. update, through read-only lookups behind the
//! [`CatalogLookup`] trait. Matching is case-insensitive but otherwise exact;
//! there is no fuzzy matching. An existing variant is only ever a
//! stock-update: color, size and sku of a catalog variant are never
//! overwritten by an import.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::AppResult;

use super::grouper::{GroupedProduct, GroupedVariant};

/// A resolved collection target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRef {
    pub id: i32,
    pub name: String,
}

/// Create-or-update decision. Updates carry the id of the existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAction {
    Create,
    Update(i32),
}

/// Read-only catalog lookups used by the matcher. Implemented by the
/// repository; mocked in tests.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn find_product_by_reference(&self, reference: &str) -> AppResult<Option<i32>>;
    async fn find_product_by_name(&self, name: &str) -> AppResult<Option<i32>>;
    async fn find_variant_by_sku(&self, sku: &str) -> AppResult<Option<i32>>;
    async fn collection_by_id(&self, id: i32) -> AppResult<Option<CollectionRef>>;
    async fn active_collection(&self) -> AppResult<Option<CollectionRef>>;
}

/// One variant with its create/update decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantMatch {
    pub variant: GroupedVariant,
    pub action: MatchAction,
}

/// One grouped product with its decision and its variants' decisions
#[derive(Debug, Clone, PartialEq)]
pub struct ProductMatch {
    pub product: GroupedProduct,
    pub action: MatchAction,
    pub variants: Vec<VariantMatch>,
}

impl ProductMatch {
    pub fn is_create(&self) -> bool {
        matches!(self.action, MatchAction::Create)
    }
}

/// Classify every group and variant against the catalog, preserving the
/// grouper's order.
pub async fn match_groups(
    groups: Vec<GroupedProduct>,
    catalog: &dyn CatalogLookup,
) -> AppResult<Vec<ProductMatch>> {
    let mut matches = Vec::with_capacity(groups.len());
    for mut group in groups {
        let existing = match group.reference.as_deref().filter(|r| !r.is_empty()) {
            Some(reference) => catalog.find_product_by_reference(reference).await?,
            None => catalog.find_product_by_name(&group.name).await?,
        };
        let action = match existing {
            Some(id) => MatchAction::Update(id),
            None => MatchAction::Create,
        };

        let variants = std::mem::take(&mut group.variants);
        let mut variant_matches = Vec::with_capacity(variants.len());
        for variant in variants {
            let action = match catalog.find_variant_by_sku(&variant.sku).await? {
                Some(id) => MatchAction::Update(id),
                None => MatchAction::Create,
            };
            variant_matches.push(VariantMatch { variant, action });
        }

        matches.push(ProductMatch {
            product: group,
            action,
            variants: variant_matches,
        });
    }
    Ok(matches)
}

/// Resolve the target collection once, at the start of preview or execute:
/// the explicit identifier takes precedence, then the currently active
/// collection. Absence is never a blocking condition; products are simply
/// left without an assignment.
pub async fn resolve_collection(
    explicit: Option<i32>,
    catalog: &dyn CatalogLookup,
) -> AppResult<Option<CollectionRef>> {
    if let Some(id) = explicit {
        if let Some(collection) = catalog.collection_by_id(id).await? {
            return Ok(Some(collection));
        }
        tracing::warn!("requested collection {} not found, falling back to active", id);
    }
    catalog.active_collection().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    fn group(name: &str, reference: Option<&str>, skus: &[&str]) -> GroupedProduct {
        GroupedProduct {
            first_row: 1,
            name: name.to_string(),
            reference: reference.map(str::to_string),
            description: None,
            price: Decimal::new(2990, 2),
            brand: None,
            category: Some("tops".to_string()),
            materials: None,
            care_instructions: None,
            made_in: None,
            variants: skus
                .iter()
                .enumerate()
                .map(|(i, sku)| GroupedVariant {
                    row: i + 1,
                    color: "Black".to_string(),
                    size: "M".to_string(),
                    sku: sku.to_string(),
                    stock: 5,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_unknown_product_and_variants_are_creates() {
        let mut catalog = MockCatalogLookup::new();
        catalog
            .expect_find_product_by_reference()
            .with(eq("T1"))
            .returning(|_| Ok(None));
        catalog.expect_find_variant_by_sku().returning(|_| Ok(None));

        let matches = match_groups(vec![group("Tee", Some("T1"), &["T1-BLK-M"])], &catalog)
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert!(matches[0].is_create());
        assert_eq!(matches[0].variants[0].action, MatchAction::Create);
    }

    #[tokio::test]
    async fn test_existing_reference_and_sku_are_updates() {
        let mut catalog = MockCatalogLookup::new();
        catalog
            .expect_find_product_by_reference()
            .with(eq("T1"))
            .returning(|_| Ok(Some(42)));
        catalog
            .expect_find_variant_by_sku()
            .with(eq("T1-BLK-M"))
            .returning(|_| Ok(Some(7)));

        let matches = match_groups(vec![group("Tee", Some("T1"), &["T1-BLK-M"])], &catalog)
            .await
            .unwrap();
        assert_eq!(matches[0].action, MatchAction::Update(42));
        assert_eq!(matches[0].variants[0].action, MatchAction::Update(7));
    }

    #[tokio::test]
    async fn test_product_without_reference_matches_by_name() {
        let mut catalog = MockCatalogLookup::new();
        catalog
            .expect_find_product_by_name()
            .with(eq("Tee"))
            .returning(|_| Ok(Some(3)));
        catalog.expect_find_variant_by_sku().returning(|_| Ok(None));

        let matches = match_groups(vec![group("Tee", None, &["T1-BLK-M"])], &catalog)
            .await
            .unwrap();
        assert_eq!(matches[0].action, MatchAction::Update(3));
    }

    #[tokio::test]
    async fn test_explicit_collection_takes_precedence() {
        let mut catalog = MockCatalogLookup::new();
        catalog
            .expect_collection_by_id()
            .with(eq(9))
            .returning(|_| {
                Ok(Some(CollectionRef {
                    id: 9,
                    name: "Summer".to_string(),
                }))
            });

        let resolved = resolve_collection(Some(9), &catalog).await.unwrap();
        assert_eq!(resolved.map(|c| c.id), Some(9));
    }

    #[tokio::test]
    async fn test_missing_explicit_collection_falls_back_to_active() {
        let mut catalog = MockCatalogLookup::new();
        catalog
            .expect_collection_by_id()
            .with(eq(9))
            .returning(|_| Ok(None));
        catalog.expect_active_collection().returning(|| {
            Ok(Some(CollectionRef {
                id: 1,
                name: "Default".to_string(),
            }))
        });

        let resolved = resolve_collection(Some(9), &catalog).await.unwrap();
        assert_eq!(resolved.map(|c| c.id), Some(1));
    }

    #[tokio::test]
    async fn test_no_collection_resolves_to_none() {
        let mut catalog = MockCatalogLookup::new();
        catalog.expect_active_collection().returning(|| Ok(None));

        let resolved = resolve_collection(None, &catalog).await.unwrap();
        assert!(resolved.is_none());
    }
}
