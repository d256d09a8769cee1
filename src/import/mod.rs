//! Collection import reconciliation engine
//!
//! Turns flat tabular input (a 14-column product CSV, or a pasted 4-column
//! stock table) into a validated, idempotent set of catalog mutations:
//!
//! parser -> validator -> grouper -> matcher -> (preview | execute)
//!
//! Preview and execute are independent entry points over the same upstream
//! stages. Preview is side-effect-free and never shares a code path with the
//! stage that performs writes; execute re-derives everything from the raw rows
//! rather than trusting a client-supplied preview. All stages up to the
//! matcher are pure; the matcher only performs read-only catalog lookups
//! through the [`matcher::CatalogLookup`] trait.

pub mod grouper;
pub mod matcher;
pub mod parser;
pub mod preview;
pub mod validator;

pub use grouper::{group_rows, GroupedProduct, GroupedVariant};
pub use matcher::{match_groups, resolve_collection, CatalogLookup, CollectionRef, MatchAction};
pub use parser::{FullRowParser, StockRowParser};
pub use preview::build_preview;
pub use validator::{validate_rows, RowReport, TaxonomyIndex};
