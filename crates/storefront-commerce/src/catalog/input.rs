//! Admin form inputs for products and categories.

use serde::{Deserialize, Serialize};

use crate::catalog::{current_timestamp, slugify, Category, Product, ProductStatus, ProductVariant};
use crate::error::FieldErrors;
use crate::ids::{CategoryId, ProductId, VariantId};
use crate::money::Money;

/// Fields submitted by the product form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category_id: CategoryId,
    pub price: Money,
    #[serde(default)]
    pub sale_price: Option<Money>,
    /// Signed so that negative form values reach validation.
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub new_arrival: bool,
    #[serde(default)]
    pub sale: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ProductInput {
    pub fn new(name: impl Into<String>, category_id: impl Into<CategoryId>, price: Money) -> Self {
        Self {
            name: name.into(),
            description: None,
            category_id: category_id.into(),
            price,
            sale_price: None,
            stock: 0,
            images: Vec::new(),
            status: ProductStatus::Published,
            featured: false,
            new_arrival: false,
            sale: false,
            tags: Vec::new(),
        }
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_sale_price(mut self, price: Money) -> Self {
        self.sale_price = Some(price);
        self
    }

    /// Check the fields that do not need catalog lookups.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "Product name is required");
        }
        if self.category_id.as_str().is_empty() {
            errors.add("categoryId", "Category is required");
        }
        if self.price.is_negative() {
            errors.add("price", "Price must be a positive number");
        }
        if self.sale_price.map_or(false, |p| p.is_negative()) {
            errors.add("salePrice", "Sale price must be a positive number");
        }
        if self.stock < 0 || self.stock > i64::from(u32::MAX) {
            errors.add("stock", "Stock must be a positive number");
        }
        if self.images.iter().all(|i| i.trim().is_empty()) {
            errors.add("images", "At least one image is required");
        }
        errors
    }

    /// Build a new product with a single variant. Call after validation.
    pub(crate) fn into_product(self, id: ProductId, variant_id: VariantId) -> Product {
        let mut product = Product::new(id, self.name.clone(), self.category_id.clone());
        product.variants.push(ProductVariant::new(variant_id, self.price));
        self.apply_to(&mut product);
        product
    }

    /// Overwrite a product's fields. Price, sale price, stock and images are
    /// written to every variant.
    pub(crate) fn apply_to(self, product: &mut Product) {
        product.slug = slugify(&self.name);
        product.name = self.name;
        product.description = self.description.unwrap_or_default();
        product.category_id = self.category_id;
        product.status = self.status;
        product.featured = self.featured;
        product.new_arrival = self.new_arrival;
        product.sale = self.sale;
        product.tags.clear();
        for tag in self.tags {
            product.add_tag(tag);
        }
        let stock = u32::try_from(self.stock).unwrap_or(0);
        let images: Vec<String> = self
            .images
            .into_iter()
            .filter(|i| !i.trim().is_empty())
            .collect();
        for variant in &mut product.variants {
            variant.price = self.price;
            variant.sale_price = self.sale_price;
            variant.stock = stock;
            variant.images = images.clone();
        }
        product.updated_at = current_timestamp();
    }
}

/// Prefill the form from an existing product's first variant.
impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        let variant = product.first_variant();
        Self {
            name: product.name.clone(),
            description: Some(product.description.clone()).filter(|d| !d.is_empty()),
            category_id: product.category_id.clone(),
            price: variant.map(|v| v.price).unwrap_or_default(),
            sale_price: variant.and_then(|v| v.sale_price),
            stock: variant.map_or(0, |v| i64::from(v.stock)),
            images: variant.map(|v| v.images.clone()).unwrap_or_default(),
            status: product.status,
            featured: product.featured,
            new_arrival: product.new_arrival,
            sale: product.sale,
            tags: product.tags.clone(),
        }
    }
}

/// Fields submitted by the category dialog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub image: String,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            image: image.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "Category name is required");
        }
        if !is_http_url(&self.image) {
            errors.add("image", "A valid image URL is required");
        }
        errors
    }

    pub(crate) fn into_category(self, id: CategoryId) -> Category {
        let mut category = Category::new(id, self.name, self.image);
        category.description = self.description.filter(|d| !d.trim().is_empty());
        category
    }

    pub(crate) fn apply_to(self, category: &mut Category) {
        category.slug = slugify(&self.name);
        category.name = self.name;
        category.description = self.description.filter(|d| !d.trim().is_empty());
        category.image = self.image;
    }
}

impl From<&Category> for CategoryInput {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone(),
            image: category.image.clone(),
        }
    }
}

fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or("");
            !host.is_empty() && !host.contains(char::is_whitespace)
        }
        None => false,
    }
}
