//! Catalog administration commands.
//!
//! Edits are applied to the catalog file named by `catalog.path` and written
//! back to it. A missing file starts an empty catalog.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use storefront_commerce::catalog::{CategoryInput, InMemoryCatalog, ProductInput};
use storefront_commerce::search::{ListingQuery, ProductSource, SortOption};
use storefront_commerce::{CategoryId, CommerceError, Currency, Money};

use super::catalog::write_catalog;
use super::{
    AdminArgs, AdminCommand, CategoryCommand, CategoryFields, ProductCommand, ProductFields,
};
use crate::context::Context;
use crate::output::{status_badge, truncate};

const PRODUCT_WIDTHS: [usize; 5] = [30, 10, 6, 28, 9];

/// Run the admin command.
pub fn run(args: AdminArgs, ctx: &Context) -> Result<()> {
    let Some(path) = ctx.catalog_path() else {
        bail!(
            "No catalog file configured. Run `storefront catalog export -o catalog.json` \
             then `storefront config set catalog.path catalog.json`."
        );
    };

    let mut catalog = if path.exists() {
        ctx.load_catalog()?
    } else {
        ctx.output.info(&format!("Starting a new catalog at {}", path.display()));
        InMemoryCatalog::new()
    };

    let changed = match args.command {
        AdminCommand::Product(command) => product(command, ctx, &mut catalog)?,
        AdminCommand::Category(command) => category(command, ctx, &mut catalog)?,
    };

    if changed {
        write_catalog(&path, &catalog)?;
        ctx.output.debug(&format!("Saved {}", path.display()));
    }
    Ok(())
}

/// Returns whether the catalog changed.
fn product(
    command: ProductCommand,
    ctx: &Context,
    catalog: &mut InMemoryCatalog,
) -> Result<bool> {
    match command {
        ProductCommand::List { page } => {
            list_products(page, ctx, catalog)?;
            Ok(false)
        }
        ProductCommand::Create(fields) => {
            let Some(price) = fields.price else {
                bail!("--price is required");
            };
            let currency = currency(ctx);
            let base = ProductInput::new(
                fields.name.clone().unwrap_or_default(),
                CategoryId::new(""),
                Money::from_decimal(price, currency),
            );
            let input = fields.apply_to(base, currency, catalog);

            let product = form_result(ctx, catalog.create_product(input))?;
            if ctx.output.is_json() {
                ctx.output.json(&product);
            }
            ctx.output.success(&format!(
                "Created {} ({}) with id {}",
                product.name, product.slug, product.id
            ));
            Ok(true)
        }
        ProductCommand::Update { slug, fields } => {
            let existing = catalog
                .find_by_slug_any(&slug)
                .cloned()
                .with_context(|| format!("No product with slug '{}'", slug))?;
            let input = fields.apply_to(ProductInput::from(&existing), currency(ctx), catalog);

            let product = form_result(ctx, catalog.update_product(&existing.id, input))?;
            if ctx.output.is_json() {
                ctx.output.json(&product);
            }
            ctx.output.success(&format!("Updated {} ({})", product.name, product.slug));
            Ok(true)
        }
        ProductCommand::Delete { slug, yes } => {
            let existing = catalog
                .find_by_slug_any(&slug)
                .cloned()
                .with_context(|| format!("No product with slug '{}'", slug))?;
            if !confirm(yes, &format!("Delete {}?", existing.name))? {
                ctx.output.warn("Catalog left unchanged");
                return Ok(false);
            }

            catalog.delete_product(&existing.id)?;
            ctx.output.success(&format!("Deleted {}", existing.name));
            Ok(true)
        }
        ProductCommand::BulkDelete { slugs, yes } => {
            let mut ids = Vec::new();
            for slug in &slugs {
                match catalog.find_by_slug_any(slug) {
                    Some(product) => ids.push(product.id.clone()),
                    None => ctx.output.warn(&format!("No product with slug '{}'", slug)),
                }
            }
            if ids.is_empty() {
                bail!("None of the given products exist");
            }
            if !confirm(yes, &format!("Delete {} product(s)?", ids.len()))? {
                ctx.output.warn("Catalog left unchanged");
                return Ok(false);
            }

            let deleted = catalog.delete_products(&ids);
            ctx.output.success(&format!("Deleted {} product(s)", deleted));
            Ok(deleted > 0)
        }
    }
}

fn category(
    command: CategoryCommand,
    ctx: &Context,
    catalog: &mut InMemoryCatalog,
) -> Result<bool> {
    match command {
        CategoryCommand::List => {
            let categories = catalog.categories();
            if ctx.output.is_json() {
                ctx.output.json(&categories);
                return Ok(false);
            }

            ctx.output.header("Categories");
            for category in &categories {
                ctx.output.list_item(&format!(
                    "{} ({}) id {}",
                    category.name, category.slug, category.id
                ));
            }
            Ok(false)
        }
        CategoryCommand::Create(fields) => {
            let base = CategoryInput::new(fields.name.clone().unwrap_or_default(), "");
            let category = form_result(ctx, catalog.create_category(fields.apply_to(base)))?;
            if ctx.output.is_json() {
                ctx.output.json(&category);
            }
            ctx.output.success(&format!(
                "Created category {} ({}) with id {}",
                category.name, category.slug, category.id
            ));
            Ok(true)
        }
        CategoryCommand::Update { slug, fields } => {
            let existing = catalog.category_by_slug(&slug)?;
            let input = fields.apply_to(CategoryInput::from(&existing));

            let category = form_result(ctx, catalog.update_category(&existing.id, input))?;
            ctx.output.success(&format!(
                "Updated category {} ({})",
                category.name, category.slug
            ));
            Ok(true)
        }
        CategoryCommand::Delete { slug, yes } => {
            let existing = catalog.category_by_slug(&slug)?;
            if !confirm(yes, &format!("Delete category {}?", existing.name))? {
                ctx.output.warn("Catalog left unchanged");
                return Ok(false);
            }

            catalog.delete_category(&existing.id)?;
            ctx.output.success(&format!("Deleted category {}", existing.name));
            Ok(true)
        }
    }
}

fn list_products(page: i64, ctx: &Context, catalog: &InMemoryCatalog) -> Result<()> {
    let query = ListingQuery::new()
        .including_unpublished()
        .with_sort(SortOption::NameAsc)
        .with_pagination(page, ListingQuery::DEFAULT_PER_PAGE);
    let listing = catalog.list(&query)?;

    if ctx.output.is_json() {
        ctx.output.json(&listing);
        return Ok(());
    }

    ctx.output.header("Products");
    if listing.is_empty() {
        ctx.output.info("No products found");
        return Ok(());
    }

    ctx.output.table_row(
        &["Product", "Price", "Stock", "Slug", "Status"],
        &PRODUCT_WIDTHS,
    );
    for product in &listing.items {
        let name = truncate(&product.name, PRODUCT_WIDTHS[0]);
        let price = product
            .effective_price()
            .map(|p| p.display())
            .unwrap_or_else(|| "-".to_string());
        ctx.output.table_row(
            &[
                &name,
                &price,
                &product.stock().to_string(),
                &product.slug,
                &status_badge(product.status),
            ],
            &PRODUCT_WIDTHS,
        );
    }

    if let Some(pagination) = &listing.pagination {
        ctx.output.info(&format!(
            "Page {} of {} ({} product(s))",
            pagination.page, pagination.total_pages, pagination.total
        ));
    }
    Ok(())
}

impl ProductFields {
    /// Overlay the flags that were given onto `input`.
    fn apply_to(
        self,
        mut input: ProductInput,
        currency: Currency,
        catalog: &InMemoryCatalog,
    ) -> ProductInput {
        if let Some(name) = self.name {
            input.name = name;
        }
        if let Some(description) = self.description {
            input.description = Some(description);
        }
        if let Some(category) = self.category {
            input.category_id = resolve_category(catalog, &category);
        }
        if let Some(price) = self.price {
            input.price = Money::from_decimal(price, currency);
        }
        if let Some(sale_price) = self.sale_price {
            input.sale_price = Some(Money::from_decimal(sale_price, currency));
        }
        if self.clear_sale_price {
            input.sale_price = None;
        }
        if let Some(stock) = self.stock {
            input.stock = stock;
        }
        if !self.images.is_empty() {
            input.images = self.images;
        }
        if let Some(status) = self.status {
            input.status = status;
        }
        if let Some(featured) = self.featured {
            input.featured = featured;
        }
        if let Some(new_arrival) = self.new_arrival {
            input.new_arrival = new_arrival;
        }
        if let Some(sale) = self.sale {
            input.sale = sale;
        }
        if !self.tags.is_empty() {
            input.tags = self.tags;
        }
        input
    }
}

impl CategoryFields {
    fn apply_to(self, mut input: CategoryInput) -> CategoryInput {
        if let Some(name) = self.name {
            input.name = name;
        }
        if let Some(description) = self.description {
            input.description = Some(description);
        }
        if let Some(image) = self.image {
            input.image = image;
        }
        input
    }
}

/// A category slug, or else the value taken as an id. Unknown values are
/// reported by form validation.
fn resolve_category(catalog: &InMemoryCatalog, value: &str) -> CategoryId {
    catalog
        .category_by_slug(value)
        .map(|c| c.id)
        .unwrap_or_else(|_| CategoryId::new(value))
}

/// Print one line per invalid form field before failing.
fn form_result<T>(ctx: &Context, result: Result<T, CommerceError>) -> Result<T> {
    match result {
        Err(CommerceError::Validation(errors)) => {
            let mut count = 0;
            for (field, messages) in errors.iter() {
                count += 1;
                for message in messages {
                    ctx.output.error(&format!("{}: {}", field, message));
                }
            }
            bail!("Form has {} invalid field(s)", count)
        }
        other => Ok(other?),
    }
}

fn currency(ctx: &Context) -> Currency {
    ctx.config.currency().unwrap_or(Currency::USD)
}

fn confirm(yes: bool, prompt: &str) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}
