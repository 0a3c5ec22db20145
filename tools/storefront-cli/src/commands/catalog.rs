//! Catalog browsing commands.

use std::path::Path;

use anyhow::{bail, Context as _, Result};
use serde::Serialize;
use storefront_commerce::catalog::{InMemoryCatalog, Product};
use storefront_commerce::search::{ListingQuery, ProductSource, RAIL_LIMIT, RELATED_LIMIT};

use super::{CatalogArgs, CatalogCommand, SearchArgs};
use crate::context::Context;
use crate::output::{badges, status_badge, stock_label, truncate};

const LIST_WIDTHS: [usize; 4] = [30, 10, 12, 10];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HomeView {
    featured: Vec<Product>,
    new_arrivals: Vec<Product>,
    on_sale: Vec<Product>,
}

#[derive(Serialize)]
struct ProductView<'a> {
    product: &'a Product,
    related: Vec<Product>,
}

/// Run the catalog command.
pub fn run(args: CatalogArgs, ctx: &Context, catalog: &InMemoryCatalog) -> Result<()> {
    match args.command {
        CatalogCommand::Home => home(ctx, catalog),
        CatalogCommand::Search(search_args) => search(search_args, ctx, catalog),
        CatalogCommand::Show { slug } => show(&slug, ctx, catalog),
        CatalogCommand::Categories => categories(ctx, catalog),
        CatalogCommand::Export { output, force } => export(&output, force, ctx, catalog),
    }
}

fn home(ctx: &Context, catalog: &impl ProductSource) -> Result<()> {
    let view = HomeView {
        featured: catalog.featured(RAIL_LIMIT),
        new_arrivals: catalog.new_arrivals(RAIL_LIMIT),
        on_sale: catalog.on_sale(RAIL_LIMIT),
    };

    if ctx.output.is_json() {
        ctx.output.json(&view);
        return Ok(());
    }

    for (title, products) in [
        ("Featured Products", &view.featured),
        ("New Arrivals", &view.new_arrivals),
        ("On Sale", &view.on_sale),
    ] {
        ctx.output.header(title);
        print_products(ctx, products);
    }
    Ok(())
}

/// Build a listing query from search flags.
pub(crate) fn build_query(args: &SearchArgs) -> ListingQuery {
    let mut query = ListingQuery::new().with_sort(args.sort);
    if let Some(text) = &args.query {
        query = query.with_query(text.as_str());
    }
    if let Some(category) = &args.category {
        query = query.with_category(category.as_str());
    }
    if args.featured {
        query = query.featured();
    }
    if args.new_arrivals {
        query = query.new_arrivals();
    }
    if args.sale {
        query = query.on_sale();
    }

    if args.cursor.is_some() || args.limit.is_some() {
        let limit = args.limit.unwrap_or(ListingQuery::DEFAULT_PER_PAGE);
        query.with_cursor(args.cursor.clone(), limit)
    } else {
        query.with_pagination(args.page, args.per_page)
    }
}

fn search(args: SearchArgs, ctx: &Context, catalog: &impl ProductSource) -> Result<()> {
    let query = build_query(&args);
    ctx.output.debug(&format!("{:?}", query));

    let listing = catalog.list(&query)?;

    if ctx.output.is_json() {
        ctx.output.json(&listing);
        return Ok(());
    }

    let title = match &args.query {
        Some(text) => format!("Results for \"{}\"", text),
        None => "All Products".to_string(),
    };
    ctx.output.header(&title);
    ctx.output.kv("Sort", args.sort.display_name());
    ctx.output.kv("Matches", &listing.total.to_string());

    if listing.is_empty() {
        ctx.output.info("No products found");
        return Ok(());
    }

    print_products(ctx, &listing.items);

    if let Some(pagination) = &listing.pagination {
        ctx.output.info(&format!(
            "Showing {}-{} of {} (page {} of {})",
            pagination.start_item(),
            pagination.end_item(),
            pagination.total,
            pagination.page,
            pagination.total_pages
        ));
    }
    if let Some(cursor) = &listing.next_cursor {
        ctx.output.info(&format!("More results: --cursor {}", cursor));
    }
    Ok(())
}

fn show(slug: &str, ctx: &Context, catalog: &impl ProductSource) -> Result<()> {
    let product = catalog
        .get_by_slug(slug)
        .with_context(|| format!("No product with slug '{}'", slug))?;
    let related = catalog.related(&product, RELATED_LIMIT);

    if ctx.output.is_json() {
        ctx.output.json(&ProductView {
            product: &product,
            related,
        });
        return Ok(());
    }

    ctx.output.header(&product.name);
    if !product.description.is_empty() {
        ctx.output.info(&product.description);
    }
    if let Some(variant) = product.first_variant() {
        let price = if variant.is_on_sale() {
            format!(
                "{} (was {}, {:.0}% off)",
                variant.effective_price(),
                variant.price,
                variant.discount_percentage().unwrap_or(0.0)
            )
        } else {
            variant.effective_price().display()
        };
        ctx.output.kv("Price", &price);
        ctx.output.kv("Stock", &stock_label(variant.stock));
        for (name, value) in &variant.options {
            ctx.output.kv(name, value);
        }
    }
    if let Some(category) = catalog
        .categories()
        .into_iter()
        .find(|c| c.id == product.category_id)
    {
        ctx.output.kv("Category", &category.name);
    }
    ctx.output.kv("Status", &status_badge(product.status));
    let badges = badges(&product);
    if !badges.is_empty() {
        ctx.output.kv("Badges", &badges);
    }

    if !related.is_empty() {
        ctx.output.header("You May Also Like");
        print_products(ctx, &related);
    }
    Ok(())
}

fn categories(ctx: &Context, catalog: &InMemoryCatalog) -> Result<()> {
    let categories = catalog.categories();

    if ctx.output.is_json() {
        ctx.output.json(&categories);
        return Ok(());
    }

    ctx.output.header("Categories");
    for category in &categories {
        let count = catalog.products_in_category(&category.id).len();
        ctx.output.list_item(&format!(
            "{} ({}) - {} product(s)",
            category.name, category.slug, count
        ));
        if let Some(description) = &category.description {
            ctx.output.debug(description);
        }
    }
    Ok(())
}

fn export(path: &str, force: bool, ctx: &Context, catalog: &InMemoryCatalog) -> Result<()> {
    let path = ctx.resolve_path(path);
    if path.exists() && !force {
        bail!(
            "File already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    write_catalog(&path, catalog)?;
    ctx.output.success(&format!(
        "Wrote {} product(s) to {}",
        catalog.product_count(),
        path.display()
    ));
    Ok(())
}

/// Write the catalog as pretty JSON that `catalog.path` can load.
pub(crate) fn write_catalog(path: &Path, catalog: &InMemoryCatalog) -> Result<()> {
    let json = serde_json::to_string_pretty(&catalog.data())?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write catalog: {}", path.display()))
}

fn print_products(ctx: &Context, products: &[Product]) {
    if products.is_empty() {
        ctx.output.info("Nothing here yet");
        return;
    }

    ctx.output.table_row(&["Product", "Price", "Stock", "Slug"], &LIST_WIDTHS);
    for product in products {
        let name = truncate(&product.name, LIST_WIDTHS[0]);
        let price = product
            .effective_price()
            .map(|p| p.display())
            .unwrap_or_else(|| "-".to_string());
        let stock = product.stock().to_string();
        let line = format!("{} {}", product.slug, badges(product));
        ctx.output.table_row(&[&name, &price, &stock, line.trim_end()], &LIST_WIDTHS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_commerce::catalog::fixtures::sample_catalog;
    use storefront_commerce::search::{PageRequest, SortOption};

    fn args() -> SearchArgs {
        SearchArgs {
            query: None,
            category: None,
            featured: false,
            new_arrivals: false,
            sale: false,
            sort: SortOption::Relevance,
            page: 1,
            per_page: 24,
            cursor: None,
            limit: None,
        }
    }

    #[test]
    fn test_build_query_page_mode() {
        let mut search = args();
        search.query = Some("  vase ".into());
        search.category = Some("all".into());
        search.sale = true;
        search.page = 2;

        let query = build_query(&search);
        assert_eq!(query.query.as_deref(), Some("vase"));
        assert!(query.category_slug.is_none());
        assert_eq!(
            query.paging,
            PageRequest::Page {
                page: 2,
                per_page: 24
            }
        );
    }

    #[test]
    fn test_search_far_past_the_last_page() {
        let mut search = args();
        search.page = i64::MAX;

        let listing = sample_catalog().list(&build_query(&search)).unwrap();
        assert!(listing.is_empty());
        assert_eq!(listing.total, 12);
        let pagination = listing.pagination.unwrap();
        assert_eq!((pagination.start_item(), pagination.end_item()), (0, 0));
    }

    #[test]
    fn test_build_query_cursor_mode() {
        let mut search = args();
        search.limit = Some(5);
        search.sort = SortOption::PriceAsc;

        let query = build_query(&search);
        assert_eq!(
            query.paging,
            PageRequest::Cursor {
                after: None,
                limit: 5
            }
        );
        let listing = sample_catalog().list(&query).unwrap();
        assert_eq!(listing.items.len(), 5);
        assert_eq!(listing.items[0].slug, "velvet-cushion-covers");
        assert!(listing.next_cursor.is_some());
    }

    #[test]
    fn test_export_writes_loadable_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context {
            config: Default::default(),
            config_path: None,
            output: crate::output::Output::new(false, true),
            cwd: dir.path().to_path_buf(),
            profile: None,
        };
        let catalog = sample_catalog();

        export("catalog.json", false, &ctx, &catalog).unwrap();
        assert!(export("catalog.json", false, &ctx, &catalog).is_err());

        let json = std::fs::read_to_string(dir.path().join("catalog.json")).unwrap();
        let reloaded = InMemoryCatalog::from_json(&json).unwrap();
        assert_eq!(reloaded.product_count(), 12);
    }
}
