//! Data models for Comptoir

pub mod collection;
pub mod import;
pub mod product;
pub mod taxonomy;
pub mod user;

// Re-export commonly used types
pub use collection::Collection;
pub use import::{ImportPreview, ImportResult, ParsedRow, RowValidation};
pub use product::{Product, ProductShort, Variant};
pub use taxonomy::{Brand, Category};
pub use user::UserClaims;
