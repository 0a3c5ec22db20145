//! Storefront domain types and logic.
//!
//! - **Cart**: a persisted cart store with lines, totals and change events
//! - **Catalog**: products, variants, categories and admin CRUD
//! - **Search**: listing queries with filters, sorting and pagination
//!
//! # Example
//!
//! ```rust
//! use storefront_cache::{Cache, MemoryStore};
//! use storefront_commerce::prelude::*;
//!
//! let catalog = storefront_commerce::catalog::fixtures::sample_catalog();
//! let vase = catalog.get_by_slug("minimalist-ceramic-vase").unwrap();
//!
//! let mut cart = CartStore::open(Cache::new(MemoryStore::new()));
//! cart.add_item(&vase, 1);
//! cart.add_item(&vase, 2);
//!
//! assert_eq!(cart.item_count(), 3);
//! assert_eq!(cart.total_price().display(), "$149.97");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod search;

pub use error::{CommerceError, FieldErrors};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, FieldErrors};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Cart
    pub use crate::cart::{
        CartEvent, CartLine, CartProduct, CartState, CartStore, CartSummary, SubscriptionId,
    };

    // Catalog
    pub use crate::catalog::{
        Category, CategoryInput, InMemoryCatalog, Product, ProductInput, ProductStatus,
        ProductVariant,
    };

    // Search
    pub use crate::search::{
        Filter, Listing, ListingQuery, PageRequest, Pagination, ProductSource, SortOption,
    };
}
