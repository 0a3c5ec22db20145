//! Listing filter types.

use crate::catalog::{Product, ProductStatus};
use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// A predicate over products. A listing keeps products matching every filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Filter {
    /// Name/description substring or exact tag, case-insensitive.
    Text(String),
    /// Products in one category.
    Category(CategoryId),
    /// Featured products only.
    Featured,
    /// New arrivals only.
    NewArrival,
    /// Products flagged for the sale rail.
    Sale,
    /// Products with the given status.
    Status(ProductStatus),
}

impl Filter {
    /// Create a text filter.
    pub fn text(query: impl Into<String>) -> Self {
        Filter::Text(query.into())
    }

    /// Create a category filter.
    pub fn category(id: impl Into<CategoryId>) -> Self {
        Filter::Category(id.into())
    }

    /// Whether `product` passes this filter.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Filter::Text(query) => product.matches_text(query),
            Filter::Category(id) => &product.category_id == id,
            Filter::Featured => product.featured,
            Filter::NewArrival => product.new_arrival,
            Filter::Sale => product.sale,
            Filter::Status(status) => product.status == *status,
        }
    }
}
