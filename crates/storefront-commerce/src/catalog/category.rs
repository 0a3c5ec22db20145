//! Category types for product organization.

use crate::catalog::slugify;
use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// A product category. Categories are flat; each product belongs to one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// URL-friendly slug, derived from the name.
    pub slug: String,
    /// Category description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category image URL.
    pub image: String,
}

impl Category {
    /// Create a category, deriving its slug from the name.
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>, image: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            slug: slugify(&name),
            name,
            description: None,
            image: image.into(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
