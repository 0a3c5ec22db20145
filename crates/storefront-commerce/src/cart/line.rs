//! Cart line types.

use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Display snapshot of a product, taken when it is added to the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    /// Unit list price.
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Available stock when the snapshot was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

impl CartProduct {
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: String::new(),
            price,
            sale_price: None,
            image: None,
            stock: None,
        }
    }

    pub fn with_sale_price(mut self, sale_price: Money) -> Self {
        self.sale_price = Some(sale_price);
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = Some(stock);
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }
}

impl From<&Product> for CartProduct {
    /// Snapshot the product's first variant. Products without variants are
    /// added at zero price with no stock limit.
    fn from(product: &Product) -> Self {
        let variant = product.first_variant();
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            price: variant.map_or_else(Money::default, |v| v.price),
            sale_price: variant.and_then(|v| v.sale_price),
            image: product.primary_image().map(str::to_string),
            stock: variant.map(|v| v.stock),
        }
    }
}

/// One product held in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    pub quantity: u32,
}

impl CartLine {
    /// Create a line for `product` holding `quantity` units.
    pub fn new(product: CartProduct, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name,
            slug: product.slug,
            price: product.price,
            sale_price: product.sale_price,
            image: product.image,
            stock: product.stock,
            quantity,
        }
    }

    /// Create a line from a catalog product's first variant.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self::new(CartProduct::from(product), quantity)
    }

    /// Sale price when one is set, the list price otherwise.
    pub fn effective_price(&self) -> Money {
        self.sale_price.unwrap_or(self.price)
    }

    /// Quantity times the effective price.
    pub fn line_total(&self) -> Money {
        self.effective_price().saturating_mul(self.quantity)
    }

    /// Whether one more unit fits within the stock snapshot.
    pub fn can_increment(&self) -> bool {
        self.stock.map_or(true, |stock| self.quantity < stock)
    }

    /// Whether the line is priced below list.
    pub fn is_discounted(&self) -> bool {
        self.sale_price
            .map_or(false, |sale| sale.amount_cents < self.price.amount_cents)
    }
}
