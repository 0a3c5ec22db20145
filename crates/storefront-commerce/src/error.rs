//! Commerce error types.

use std::collections::BTreeMap;
use std::fmt;

use storefront_cache::CacheError;
use thiserror::Error;

/// Errors that can occur in catalog and listing operations.
///
/// Cart operations never fail: persistence problems are logged and swallowed
/// by the cart store, so nothing here is returned from it.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Another product or category already uses this slug.
    #[error("Slug already in use: {0}")]
    DuplicateSlug(String),

    /// Category still has products attached.
    #[error("Category {slug} still has {products} product(s)")]
    CategoryInUse { slug: String, products: usize },

    /// Listing cursor does not point at a product in the result set.
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    /// Form input failed validation.
    #[error("Invalid form data: {0}")]
    Validation(FieldErrors),

    /// Storage error.
    #[error("Storage error: {0}")]
    Cache(#[from] CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Validation messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Create an empty set of errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Messages for one field.
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `field` has any message.
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(())` when empty, otherwise a [`CommerceError::Validation`].
    pub fn into_result(self) -> Result<(), CommerceError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CommerceError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}
