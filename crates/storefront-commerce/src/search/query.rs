//! Listing query builder.

use std::fmt;
use std::str::FromStr;

use crate::search::Filter;
use serde::{Deserialize, Serialize};

/// Sort options for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Best match first. Without a ranking signal this is newest first.
    #[default]
    Relevance,
    /// Newest first.
    Newest,
    /// Oldest first.
    Oldest,
    /// Name A-Z.
    NameAsc,
    /// Name Z-A.
    NameDesc,
    /// Effective price, low to high.
    PriceAsc,
    /// Effective price, high to low.
    PriceDesc,
}

impl SortOption {
    /// All options in menu order.
    pub const ALL: [SortOption; 7] = [
        SortOption::Relevance,
        SortOption::Newest,
        SortOption::Oldest,
        SortOption::NameAsc,
        SortOption::NameDesc,
        SortOption::PriceAsc,
        SortOption::PriceDesc,
    ];

    /// The query-string form, e.g. `price-asc`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Relevance => "relevance",
            SortOption::Newest => "newest",
            SortOption::Oldest => "oldest",
            SortOption::NameAsc => "name-asc",
            SortOption::NameDesc => "name-desc",
            SortOption::PriceAsc => "price-asc",
            SortOption::PriceDesc => "price-desc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Relevance => "Relevance",
            SortOption::Newest => "Newest",
            SortOption::Oldest => "Oldest",
            SortOption::NameAsc => "Name: A-Z",
            SortOption::NameDesc => "Name: Z-A",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOption::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or_else(|| format!("unknown sort option: {}", s))
    }
}

/// How a listing is cut into pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageRequest {
    /// Numbered pages (1-indexed).
    Page { page: i64, per_page: i64 },
    /// Items after the product whose id is `after`.
    Cursor { after: Option<String>, limit: i64 },
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::Page {
            page: 1,
            per_page: ListingQuery::DEFAULT_PER_PAGE,
        }
    }
}

/// A product listing request.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListingQuery {
    /// Text query, also present as a [`Filter::Text`].
    pub query: Option<String>,
    /// Category slug, resolved by the product source.
    pub category_slug: Option<String>,
    /// Filters to apply.
    pub filters: Vec<Filter>,
    /// Include drafts and archived products (admin views).
    pub include_unpublished: bool,
    /// Sort option.
    pub sort: SortOption,
    /// Pagination.
    pub paging: PageRequest,
}

impl ListingQuery {
    pub const DEFAULT_PER_PAGE: i64 = 24;
    pub const MAX_PER_PAGE: i64 = 100;

    /// Create a new listing query: published products, newest first, page 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text query. Blank queries are ignored.
    pub fn with_query(mut self, q: impl Into<String>) -> Self {
        let q = q.into();
        let q = q.trim();
        if !q.is_empty() {
            self.query = Some(q.to_string());
            self.filters.push(Filter::Text(q.to_string()));
        }
        self
    }

    /// Restrict to a category by slug. `"all"` means no restriction.
    pub fn with_category(mut self, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        self.category_slug = if slug.is_empty() || slug == "all" {
            None
        } else {
            Some(slug)
        };
        self
    }

    /// Add a filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn featured(self) -> Self {
        self.with_filter(Filter::Featured)
    }

    pub fn new_arrivals(self) -> Self {
        self.with_filter(Filter::NewArrival)
    }

    pub fn on_sale(self) -> Self {
        self.with_filter(Filter::Sale)
    }

    /// Include unpublished products.
    pub fn including_unpublished(mut self) -> Self {
        self.include_unpublished = true;
        self
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Use numbered pages.
    pub fn with_pagination(mut self, page: i64, per_page: i64) -> Self {
        self.paging = PageRequest::Page {
            page: page.max(1),
            per_page: per_page.clamp(1, Self::MAX_PER_PAGE),
        };
        self
    }

    /// Use cursor pagination, starting after the product with id `after`.
    pub fn with_cursor(mut self, after: Option<String>, limit: i64) -> Self {
        self.paging = PageRequest::Cursor {
            after,
            limit: limit.clamp(1, Self::MAX_PER_PAGE),
        };
        self
    }

    /// Filters that apply regardless of category, including the
    /// published-only restriction.
    pub fn effective_filters(&self) -> Vec<Filter> {
        let mut filters = self.filters.clone();
        if !self.include_unpublished {
            filters.push(Filter::Status(crate::catalog::ProductStatus::Published));
        }
        filters
    }
}
