//! In-memory catalog.
//!
//! Holds products and categories in insertion order and answers listing
//! queries by filtering, sorting and paginating in memory. Prices live on
//! variants, so price sorts always happen here rather than in a query.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{current_timestamp, slugify, Category, CategoryInput, Product, ProductInput};
use crate::error::CommerceError;
use crate::ids::{CategoryId, ProductId, VariantId};
use crate::search::{Filter, Listing, ListingQuery, PageRequest, Pagination, ProductSource, SortOption};

/// Serializable contents of a catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogData {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// A catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    categories: Vec<Category>,
    products: Vec<Product>,
    next_product_id: i64,
    next_category_id: i64,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::from_data(CatalogData::default())
    }

    /// Create a catalog from existing data. New ids continue after the
    /// largest numeric id already present.
    pub fn from_data(data: CatalogData) -> Self {
        let next_product_id = next_numeric_id(data.products.iter().map(|p| p.id.as_str()));
        let next_category_id = next_numeric_id(data.categories.iter().map(|c| c.id.as_str()));
        Self {
            categories: data.categories,
            products: data.products,
            next_product_id,
            next_category_id,
        }
    }

    /// Parse a catalog from JSON text.
    pub fn from_json(json: &str) -> Result<Self, CommerceError> {
        let data: CatalogData = serde_json::from_str(json)?;
        Ok(Self::from_data(data))
    }

    /// Snapshot the catalog contents.
    pub fn data(&self) -> CatalogData {
        CatalogData {
            categories: self.categories.clone(),
            products: self.products.clone(),
        }
    }

    /// Number of products in any status.
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// A product by slug in any status (admin edit page).
    pub fn find_by_slug_any(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug == slug)
    }

    /// A category by id.
    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Published products in a category, for the category page.
    pub fn products_in_category(&self, id: &CategoryId) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.is_published() && &p.category_id == id)
            .cloned()
            .collect()
    }

    // Admin: products

    /// Create a product with a single variant from form input.
    pub fn create_product(&mut self, input: ProductInput) -> Result<Product, CommerceError> {
        self.validate_product(&input, None)?;

        let id = ProductId::from(self.next_product_id);
        let variant_id = VariantId::new(format!("{}-1", id));
        self.next_product_id += 1;

        let product = input.into_product(id, variant_id);
        info!(id = %product.id, slug = %product.slug, "created product");
        self.products.push(product.clone());
        Ok(product)
    }

    /// Overwrite a product from form input. The slug is regenerated from the
    /// name and price/stock/images are written to every variant.
    pub fn update_product(
        &mut self,
        id: &ProductId,
        input: ProductInput,
    ) -> Result<Product, CommerceError> {
        self.validate_product(&input, Some(id))?;

        let product = self
            .products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))?;
        input.apply_to(product);
        info!(id = %product.id, slug = %product.slug, "updated product");
        Ok(product.clone())
    }

    /// Delete a product.
    pub fn delete_product(&mut self, id: &ProductId) -> Result<Product, CommerceError> {
        let index = self
            .products
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))?;
        let product = self.products.remove(index);
        info!(id = %product.id, "deleted product");
        Ok(product)
    }

    /// Delete every product whose id is listed. Unknown ids are skipped.
    /// Returns the number deleted.
    pub fn delete_products(&mut self, ids: &[ProductId]) -> usize {
        let before = self.products.len();
        self.products.retain(|p| !ids.contains(&p.id));
        let deleted = before - self.products.len();
        info!(requested = ids.len(), deleted, "bulk deleted products");
        deleted
    }

    fn validate_product(
        &self,
        input: &ProductInput,
        existing: Option<&ProductId>,
    ) -> Result<(), CommerceError> {
        let mut errors = input.validate();
        if !errors.has("categoryId") && self.category(&input.category_id).is_none() {
            errors.add("categoryId", "Category is required");
        }
        errors.into_result()?;

        let slug = slugify(&input.name);
        if self
            .products
            .iter()
            .any(|p| p.slug == slug && Some(&p.id) != existing)
        {
            return Err(CommerceError::DuplicateSlug(slug));
        }
        Ok(())
    }

    // Admin: categories

    /// Create a category from form input.
    pub fn create_category(&mut self, input: CategoryInput) -> Result<Category, CommerceError> {
        self.validate_category(&input, None)?;

        let id = CategoryId::from(self.next_category_id);
        self.next_category_id += 1;

        let category = input.into_category(id);
        info!(id = %category.id, slug = %category.slug, "created category");
        self.categories.push(category.clone());
        Ok(category)
    }

    /// Overwrite a category from form input.
    pub fn update_category(
        &mut self,
        id: &CategoryId,
        input: CategoryInput,
    ) -> Result<Category, CommerceError> {
        self.validate_category(&input, Some(id))?;

        let category = self
            .categories
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| CommerceError::CategoryNotFound(id.to_string()))?;
        input.apply_to(category);
        info!(id = %category.id, slug = %category.slug, "updated category");
        Ok(category.clone())
    }

    /// Delete a category that no product references.
    pub fn delete_category(&mut self, id: &CategoryId) -> Result<Category, CommerceError> {
        let index = self
            .categories
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| CommerceError::CategoryNotFound(id.to_string()))?;

        let products = self.products.iter().filter(|p| &p.category_id == id).count();
        if products > 0 {
            let slug = self.categories[index].slug.clone();
            return Err(CommerceError::CategoryInUse { slug, products });
        }

        let category = self.categories.remove(index);
        info!(id = %category.id, "deleted category");
        Ok(category)
    }

    fn validate_category(
        &self,
        input: &CategoryInput,
        existing: Option<&CategoryId>,
    ) -> Result<(), CommerceError> {
        input.validate().into_result()?;

        let slug = slugify(&input.name);
        if self
            .categories
            .iter()
            .any(|c| c.slug == slug && Some(&c.id) != existing)
        {
            return Err(CommerceError::DuplicateSlug(slug));
        }
        Ok(())
    }

    // Listing helpers

    fn published_where(&self, filter: Filter, limit: usize) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.is_published() && filter.matches(p))
            .take(limit)
            .cloned()
            .collect()
    }

    fn sorted<'a>(&self, mut products: Vec<(usize, &'a Product)>, sort: SortOption) -> Vec<&'a Product> {
        // Newest first, later insertions winning ties; other orders are stable on top of it.
        products.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));

        let mut products: Vec<&Product> = products.into_iter().map(|(_, p)| p).collect();
        match sort {
            SortOption::Relevance | SortOption::Newest => {}
            SortOption::Oldest => products.reverse(),
            SortOption::NameAsc => products.sort_by_key(|p| p.name.to_lowercase()),
            SortOption::NameDesc => {
                products.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()))
            }
            SortOption::PriceAsc => products.sort_by_key(|p| price_key(p, i64::MAX)),
            SortOption::PriceDesc => {
                products.sort_by_key(|p| std::cmp::Reverse(price_key(p, i64::MIN)))
            }
        }
        products
    }
}

/// Effective price in cents, with `missing` for products without variants.
fn price_key(product: &Product, missing: i64) -> i64 {
    product
        .effective_price()
        .map(|m| m.amount_cents)
        .unwrap_or(missing)
}

fn next_numeric_id<'a>(ids: impl Iterator<Item = &'a str>) -> i64 {
    ids.filter_map(|id| id.parse::<i64>().ok())
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

impl ProductSource for InMemoryCatalog {
    fn list(&self, query: &ListingQuery) -> Result<Listing<Product>, CommerceError> {
        let mut filters = query.effective_filters();
        if let Some(slug) = &query.category_slug {
            match self.categories.iter().find(|c| &c.slug == slug) {
                Some(category) => filters.push(Filter::Category(category.id.clone())),
                None => {
                    debug!(slug = %slug, "listing unknown category");
                    return Ok(Listing::empty());
                }
            }
        }

        let matched: Vec<(usize, &Product)> = self
            .products
            .iter()
            .enumerate()
            .filter(|(_, p)| filters.iter().all(|f| f.matches(p)))
            .collect();
        let matched = self.sorted(matched, query.sort);
        let total = matched.len();

        let listing = match &query.paging {
            PageRequest::Page { page, per_page } => {
                let pagination = Pagination::new(*page, *per_page, total as i64);
                let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
                let items = matched
                    .iter()
                    .skip(offset)
                    .take(usize::try_from(pagination.per_page).unwrap_or(0))
                    .map(|p| (*p).clone())
                    .collect();
                Listing {
                    items,
                    total,
                    next_cursor: None,
                    pagination: Some(pagination),
                }
            }
            PageRequest::Cursor { after, limit } => {
                let start = match after {
                    Some(after) => {
                        matched
                            .iter()
                            .position(|p| p.id.as_str() == after)
                            .ok_or_else(|| CommerceError::InvalidCursor(after.clone()))?
                            + 1
                    }
                    None => 0,
                };
                let limit = usize::try_from(*limit).unwrap_or(1).max(1);
                let end = start.saturating_add(limit).min(total);
                let page = matched.get(start..end).unwrap_or(&[]);
                let next_cursor = if end < total {
                    page.last().map(|p| p.id.to_string())
                } else {
                    None
                };
                Listing {
                    items: page.iter().map(|p| (*p).clone()).collect(),
                    total,
                    next_cursor,
                    pagination: None,
                }
            }
        };

        debug!(total, returned = listing.len(), sort = %query.sort, "listed products");
        Ok(listing)
    }

    fn get_by_slug(&self, slug: &str) -> Result<Product, CommerceError> {
        self.products
            .iter()
            .find(|p| p.slug == slug && p.is_published())
            .cloned()
            .ok_or_else(|| CommerceError::ProductNotFound(slug.to_string()))
    }

    fn get_by_id(&self, id: &ProductId) -> Result<Product, CommerceError> {
        self.products
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    fn featured(&self, limit: usize) -> Vec<Product> {
        self.published_where(Filter::Featured, limit)
    }

    fn new_arrivals(&self, limit: usize) -> Vec<Product> {
        self.published_where(Filter::NewArrival, limit)
    }

    fn on_sale(&self, limit: usize) -> Vec<Product> {
        self.published_where(Filter::Sale, limit)
    }

    fn related(&self, product: &Product, limit: usize) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| {
                p.is_published() && p.category_id == product.category_id && p.id != product.id
            })
            .take(limit)
            .cloned()
            .collect()
    }

    fn categories(&self) -> Vec<Category> {
        let mut categories = self.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    fn category_by_slug(&self, slug: &str) -> Result<Category, CommerceError> {
        self.categories
            .iter()
            .find(|c| c.slug == slug)
            .cloned()
            .ok_or_else(|| CommerceError::CategoryNotFound(slug.to_string()))
    }
}

/// Stamp creation times one second apart, oldest first, so that listings
/// sorted by age follow insertion order.
pub(crate) fn stamp_in_order(products: &mut [Product]) {
    let base = current_timestamp() - products.len() as i64;
    for (offset, product) in products.iter_mut().enumerate() {
        product.created_at = base + offset as i64;
        product.updated_at = product.created_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{fixtures, ProductStatus, ProductVariant};
    use crate::money::Money;

    fn catalog() -> InMemoryCatalog {
        fixtures::sample_catalog()
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_default_listing_is_newest_first() {
        let listing = catalog().list(&ListingQuery::new()).unwrap();
        assert_eq!(listing.total, 12);
        assert_eq!(listing.items.first().map(|p| p.id.as_str()), Some("p12"));
        assert_eq!(listing.items.last().map(|p| p.id.as_str()), Some("p1"));
    }

    #[test]
    fn test_category_filter_and_unknown_category() {
        let catalog = catalog();
        let listing = catalog
            .list(&ListingQuery::new().with_category("kitchen").with_sort(SortOption::Oldest))
            .unwrap();
        assert_eq!(ids(&listing.items), vec!["p8", "p12"]);

        let listing = catalog.list(&ListingQuery::new().with_category("garden")).unwrap();
        assert!(listing.is_empty());
        assert_eq!(listing.total, 0);
    }

    #[test]
    fn test_price_sort_uses_sale_price() {
        let listing = catalog()
            .list(&ListingQuery::new().on_sale().with_sort(SortOption::PriceAsc))
            .unwrap();
        // Linen sheets 69.99, wool rug 159.99, bookshelf 299.99
        assert_eq!(ids(&listing.items), vec!["p6", "p3", "p11"]);

        let listing = catalog()
            .list(&ListingQuery::new().on_sale().with_sort(SortOption::PriceDesc))
            .unwrap();
        assert_eq!(ids(&listing.items), vec!["p11", "p3", "p6"]);
    }

    #[test]
    fn test_text_search() {
        let listing = catalog()
            .list(&ListingQuery::new().with_query("ceramic").with_sort(SortOption::Oldest))
            .unwrap();
        assert_eq!(ids(&listing.items), vec!["p1", "p8"]);
    }

    #[test]
    fn test_page_pagination() {
        let listing = catalog()
            .list(&ListingQuery::new().with_sort(SortOption::Oldest).with_pagination(3, 5))
            .unwrap();
        assert_eq!(ids(&listing.items), vec!["p11", "p12"]);
        let pagination = listing.pagination.unwrap();
        assert_eq!(pagination.total_pages, 3);
        assert!(!pagination.has_next);
        assert!(listing.next_cursor.is_none());
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let listing = catalog()
            .list(&ListingQuery::new().with_pagination(i64::MAX, 24))
            .unwrap();
        assert!(listing.is_empty());
        assert_eq!(listing.total, 12);
        let pagination = listing.pagination.unwrap();
        assert_eq!(pagination.page, i64::MAX);
        assert!(!pagination.has_next);
    }

    #[test]
    fn test_cursor_pagination_walks_every_product() {
        let catalog = catalog();
        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let listing = catalog
                .list(&ListingQuery::new().with_sort(SortOption::Oldest).with_cursor(cursor, 5))
                .unwrap();
            assert_eq!(listing.total, 12);
            seen.extend(listing.items.iter().map(|p| p.id.to_string()));
            match listing.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        assert_eq!(seen.len(), 12);
        assert_eq!(seen.first().map(String::as_str), Some("p1"));
        assert_eq!(seen.last().map(String::as_str), Some("p12"));
    }

    #[test]
    fn test_unknown_cursor_is_an_error() {
        let err = catalog()
            .list(&ListingQuery::new().with_cursor(Some("nope".into()), 5))
            .unwrap_err();
        assert!(matches!(err, CommerceError::InvalidCursor(_)));
    }

    #[test]
    fn test_rails_and_related() {
        let catalog = catalog();
        assert_eq!(ids(&catalog.featured(8)), vec!["p1", "p2", "p4", "p7", "p9", "p12"]);
        assert_eq!(ids(&catalog.new_arrivals(2)), vec!["p1", "p5"]);

        let chair = catalog.get_by_slug("modern-lounge-chair").unwrap();
        assert_eq!(ids(&catalog.related(&chair, 4)), vec!["p4", "p7", "p11"]);
    }

    #[test]
    fn test_categories_sorted_by_name() {
        let names: Vec<String> = catalog().categories().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Furniture", "Home Decor", "Kitchen", "Textiles"]);
    }

    #[test]
    fn test_drafts_hidden_from_storefront() {
        let mut catalog = catalog();
        let input = ProductInput::new("Draft Lamp", "decor", Money::usd(1000))
            .with_image("https://example.com/lamp.jpg")
            .with_status(ProductStatus::Draft);
        let draft = catalog.create_product(input).unwrap();

        assert!(catalog.get_by_slug("draft-lamp").is_err());
        assert!(catalog.find_by_slug_any("draft-lamp").is_some());
        assert!(catalog.get_by_id(&draft.id).is_ok());
        assert_eq!(catalog.list(&ListingQuery::new()).unwrap().total, 12);
        assert_eq!(
            catalog
                .list(&ListingQuery::new().including_unpublished())
                .unwrap()
                .total,
            13
        );
    }

    #[test]
    fn test_create_update_delete_product() {
        let mut catalog = InMemoryCatalog::new();
        let category = catalog
            .create_category(CategoryInput::new("Lighting", "https://example.com/l.jpg"))
            .unwrap();

        let product = catalog
            .create_product(
                ProductInput::new("Copper Lamp", category.id.clone(), Money::usd(12999))
                    .with_stock(4)
                    .with_image("https://example.com/lamp.jpg"),
            )
            .unwrap();
        assert_eq!(product.id.as_str(), "1");
        assert_eq!(product.slug, "copper-lamp");

        let updated = catalog
            .update_product(
                &product.id,
                ProductInput::new("Brass Lamp", category.id.clone(), Money::usd(9999))
                    .with_stock(2)
                    .with_image("https://example.com/brass.jpg"),
            )
            .unwrap();
        assert_eq!(updated.slug, "brass-lamp");
        assert_eq!(updated.stock(), 2);
        assert_eq!(updated.effective_price(), Some(Money::usd(9999)));

        catalog.delete_product(&product.id).unwrap();
        assert!(matches!(
            catalog.delete_product(&product.id),
            Err(CommerceError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_create_product_validation() {
        let mut catalog = catalog();
        let err = catalog
            .create_product(ProductInput::new("Stool", "no-such-category", Money::usd(100)))
            .unwrap_err();
        match err {
            CommerceError::Validation(errors) => {
                assert!(errors.has("categoryId"));
                assert!(errors.has("images"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let mut catalog = catalog();
        let err = catalog
            .create_product(
                ProductInput::new("Glass Terrarium", "decor", Money::usd(100))
                    .with_image("https://example.com/t.jpg"),
            )
            .unwrap_err();
        assert!(matches!(err, CommerceError::DuplicateSlug(slug) if slug == "glass-terrarium"));
    }

    #[test]
    fn test_delete_products_bulk() {
        let mut catalog = catalog();
        let deleted = catalog.delete_products(&[
            ProductId::new("p1"),
            ProductId::new("p2"),
            ProductId::new("missing"),
        ]);
        assert_eq!(deleted, 2);
        assert_eq!(catalog.product_count(), 10);
    }

    #[test]
    fn test_category_lifecycle() {
        let mut catalog = catalog();
        let err = catalog.delete_category(&CategoryId::new("kitchen")).unwrap_err();
        assert!(matches!(err, CommerceError::CategoryInUse { products: 2, .. }));

        let category = catalog
            .create_category(
                CategoryInput::new("Outdoor", "https://example.com/o.jpg")
                    .with_description("Patio and garden"),
            )
            .unwrap();
        let renamed = catalog
            .update_category(
                &category.id,
                CategoryInput::new("Outdoor Living", "https://example.com/o.jpg"),
            )
            .unwrap();
        assert_eq!(renamed.slug, "outdoor-living");
        assert!(renamed.description.is_none());
        assert!(catalog.category_by_slug("outdoor-living").is_ok());

        catalog.delete_category(&category.id).unwrap();
        assert!(catalog.category_by_slug("outdoor-living").is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_id_sequence() {
        let mut catalog = InMemoryCatalog::new();
        let category = catalog
            .create_category(CategoryInput::new("Lighting", "https://example.com/l.jpg"))
            .unwrap();
        catalog
            .create_product(
                ProductInput::new("Lamp", category.id.clone(), Money::usd(100))
                    .with_image("https://example.com/lamp.jpg"),
            )
            .unwrap();

        let json = serde_json::to_string(&catalog.data()).unwrap();
        let mut reloaded = InMemoryCatalog::from_json(&json).unwrap();
        assert_eq!(reloaded.data(), catalog.data());

        let next = reloaded
            .create_product(
                ProductInput::new("Sconce", category.id, Money::usd(100))
                    .with_image("https://example.com/s.jpg"),
            )
            .unwrap();
        assert_eq!(next.id.as_str(), "2");
    }

    #[test]
    fn test_products_without_variants_sort_last_by_price() {
        let mut data = CatalogData::default();
        data.categories.push(Category::new("c", "C", "https://example.com/c.jpg"));
        data.products.push(Product::new("a", "A", "c"));
        data.products
            .push(Product::new("b", "B", "c").with_variant(ProductVariant::new("vb", Money::usd(5))));
        stamp_in_order(&mut data.products);
        let catalog = InMemoryCatalog::from_data(data);

        let asc = catalog
            .list(&ListingQuery::new().with_sort(SortOption::PriceAsc))
            .unwrap();
        assert_eq!(ids(&asc.items), vec!["b", "a"]);
        let desc = catalog
            .list(&ListingQuery::new().with_sort(SortOption::PriceDesc))
            .unwrap();
        assert_eq!(ids(&desc.items), vec!["b", "a"]);
    }
}
