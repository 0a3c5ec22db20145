//! Product and variant types.

use std::collections::BTreeMap;

use crate::catalog::{current_timestamp, slugify};
use crate::ids::{CategoryId, ProductId, VariantId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Product status in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductStatus {
    /// Product is in draft mode, not visible to customers.
    Draft,
    /// Product is visible in the storefront.
    #[default]
    Published,
    /// Product is archived, not visible but data preserved.
    Archived,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "DRAFT",
            ProductStatus::Published => "PUBLISHED",
            ProductStatus::Archived => "ARCHIVED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Some(ProductStatus::Draft),
            "PUBLISHED" => Some(ProductStatus::Published),
            "ARCHIVED" => Some(ProductStatus::Archived),
            _ => None,
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// URL-friendly slug (unique).
    pub slug: String,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// Category this product belongs to.
    pub category_id: CategoryId,
    /// Product visibility status.
    #[serde(default)]
    pub status: ProductStatus,
    /// Shown in the featured rail.
    #[serde(default)]
    pub featured: bool,
    /// Shown in the new arrivals rail.
    #[serde(default)]
    pub new_arrival: bool,
    /// Shown in the sale rail.
    #[serde(default)]
    pub sale: bool,
    /// Lower-case tags for search.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Purchasable variants. The storefront sells the first one.
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created_at: i64,
    /// Unix timestamp of last update.
    #[serde(default)]
    pub updated_at: i64,
}

impl Product {
    /// Create a published product with no variants, deriving the slug from the name.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        category_id: impl Into<CategoryId>,
    ) -> Self {
        let name = name.into();
        let now = current_timestamp();
        Self {
            id: id.into(),
            slug: slugify(&name),
            name,
            description: String::new(),
            category_id: category_id.into(),
            status: ProductStatus::Published,
            featured: false,
            new_arrival: false,
            sale: false,
            tags: Vec::new(),
            variants: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a variant.
    pub fn with_variant(mut self, variant: ProductVariant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether customers can see this product.
    pub fn is_published(&self) -> bool {
        self.status == ProductStatus::Published
    }

    /// The variant the storefront sells.
    pub fn first_variant(&self) -> Option<&ProductVariant> {
        self.variants.first()
    }

    /// Price a customer pays for the first variant.
    pub fn effective_price(&self) -> Option<Money> {
        self.first_variant().map(ProductVariant::effective_price)
    }

    /// First image of the first variant.
    pub fn primary_image(&self) -> Option<&str> {
        self.first_variant()
            .and_then(|v| v.images.first())
            .map(String::as_str)
    }

    /// Stock of the first variant, zero when there is none.
    pub fn stock(&self) -> u32 {
        self.first_variant().map(|v| v.stock).unwrap_or(0)
    }

    /// Case-insensitive match against name or description, or an exact
    /// match against a tag.
    pub fn matches_text(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self.tags.iter().any(|t| *t == needle)
    }

    /// Add a tag, lower-cased, if not already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into().to_lowercase();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }
}

/// A purchasable configuration of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Unique variant identifier.
    pub id: VariantId,
    /// List price.
    pub price: Money,
    /// Sale price, when discounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Money>,
    /// Units available.
    #[serde(default)]
    pub stock: u32,
    /// Image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Option values (e.g. color, size, material).
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl ProductVariant {
    /// Create a variant with no stock, images or options.
    pub fn new(id: impl Into<VariantId>, price: Money) -> Self {
        Self {
            id: id.into(),
            price,
            sale_price: None,
            stock: 0,
            images: Vec::new(),
            options: BTreeMap::new(),
        }
    }

    pub fn with_sale_price(mut self, sale_price: Money) -> Self {
        self.sale_price = Some(sale_price);
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Sale price when set, otherwise list price.
    pub fn effective_price(&self) -> Money {
        self.sale_price.unwrap_or(self.price)
    }

    /// Whether the sale price undercuts the list price.
    pub fn is_on_sale(&self) -> bool {
        self.sale_price
            .map(|sp| sp.amount_cents < self.price.amount_cents)
            .unwrap_or(false)
    }

    /// Discount percentage when on sale.
    pub fn discount_percentage(&self) -> Option<f64> {
        if !self.is_on_sale() || self.price.amount_cents == 0 {
            return None;
        }
        let savings = self.price.amount_cents - self.effective_price().amount_cents;
        Some((savings as f64 / self.price.amount_cents as f64) * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rug() -> Product {
        Product::new("p3", "Handwoven Wool Rug", "textiles")
            .with_description("Soft and durable handwoven wool rug")
            .with_variant(
                ProductVariant::new("v3", Money::usd(19999))
                    .with_sale_price(Money::usd(15999))
                    .with_stock(12)
                    .with_image("https://example.com/rug.jpg"),
            )
    }

    #[test]
    fn test_product_creation() {
        let product = rug();
        assert_eq!(product.slug, "handwoven-wool-rug");
        assert!(product.is_published());
        assert_eq!(product.stock(), 12);
        assert_eq!(product.primary_image(), Some("https://example.com/rug.jpg"));
    }

    #[test]
    fn test_effective_price_prefers_sale() {
        assert_eq!(rug().effective_price(), Some(Money::usd(15999)));

        let plain = ProductVariant::new("v1", Money::usd(5000));
        assert_eq!(plain.effective_price(), Money::usd(5000));
        assert!(!plain.is_on_sale());
    }

    #[test]
    fn test_variant_discount() {
        let variant = ProductVariant::new("v1", Money::usd(3000)).with_sale_price(Money::usd(2000));
        assert!(variant.is_on_sale());
        let discount = variant.discount_percentage().unwrap();
        assert!((discount - 33.33).abs() < 0.1);
    }

    #[test]
    fn test_text_match() {
        let mut product = rug();
        product.add_tag("Cozy");

        assert!(product.matches_text("WOOL"));
        assert!(product.matches_text("durable"));
        assert!(product.matches_text("cozy"));
        assert!(!product.matches_text("coz"));
        assert!(!product.matches_text("marble"));
    }

    #[test]
    fn test_status_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&ProductStatus::Published).unwrap(),
            r#""PUBLISHED""#
        );
        assert_eq!(ProductStatus::parse("draft"), Some(ProductStatus::Draft));
        assert_eq!(ProductStatus::parse("gone"), None);
    }
}
