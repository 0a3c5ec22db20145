//! The product listing boundary the storefront pages depend on.

use crate::catalog::{Category, Product};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::search::{Listing, ListingQuery};

/// How many products the home page rails show.
pub const RAIL_LIMIT: usize = 8;

/// How many related products a product page shows.
pub const RELATED_LIMIT: usize = 4;

/// Supplies products and categories to the storefront.
///
/// Only published products are returned unless a query asks for
/// unpublished ones explicitly.
pub trait ProductSource {
    /// Filter, sort and paginate products.
    fn list(&self, query: &ListingQuery) -> Result<Listing<Product>, CommerceError>;

    /// A published product by slug.
    fn get_by_slug(&self, slug: &str) -> Result<Product, CommerceError>;

    /// A product by id, in any status.
    fn get_by_id(&self, id: &ProductId) -> Result<Product, CommerceError>;

    /// Published featured products.
    fn featured(&self, limit: usize) -> Vec<Product>;

    /// Published new arrivals.
    fn new_arrivals(&self, limit: usize) -> Vec<Product>;

    /// Published products flagged for the sale rail.
    fn on_sale(&self, limit: usize) -> Vec<Product>;

    /// Other published products from the same category.
    fn related(&self, product: &Product, limit: usize) -> Vec<Product>;

    /// All categories, by name.
    fn categories(&self) -> Vec<Category>;

    /// A category by slug.
    fn category_by_slug(&self, slug: &str) -> Result<Category, CommerceError>;
}
