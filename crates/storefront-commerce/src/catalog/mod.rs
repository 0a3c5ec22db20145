//! Product catalog module.
//!
//! Contains products, variants and categories, the admin form inputs that
//! create them, and an in-memory catalog that serves listings.

mod category;
pub mod fixtures;
mod input;
mod memory;
mod product;
mod slug;

pub use category::Category;
pub use input::{CategoryInput, ProductInput};
pub use memory::{CatalogData, InMemoryCatalog};
pub use product::{Product, ProductStatus, ProductVariant};
pub use slug::slugify;

/// Get current Unix timestamp.
pub(crate) fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
