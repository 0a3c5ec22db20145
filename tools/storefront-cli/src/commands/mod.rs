//! CLI command implementations.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod config;

use clap::{Args, Subcommand};
use storefront_commerce::catalog::ProductStatus;
use storefront_commerce::search::SortOption;

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart and order summary.
    Show,
    /// Add a product to the cart.
    Add {
        /// Product slug.
        slug: String,
        /// Units to add.
        #[arg(short, long, default_value = "1")]
        quantity: u32,
    },
    /// Remove a product from the cart.
    Remove {
        /// Product slug or id.
        slug: String,
    },
    /// Set the quantity of a product already in the cart.
    Set {
        /// Product slug or id.
        slug: String,
        /// New quantity (clamped to available stock).
        quantity: u32,
    },
    /// Remove everything from the cart.
    Clear {
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Show the featured, new arrival and sale rails.
    Home,
    /// Search and filter products.
    Search(SearchArgs),
    /// Show one product with related products.
    Show {
        /// Product slug.
        slug: String,
    },
    /// List categories.
    Categories,
    /// Write the catalog as JSON, for use as `catalog.path`.
    Export {
        /// Output file path.
        #[arg(short, long)]
        output: String,
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

/// Arguments for `catalog search`.
#[derive(Args)]
pub struct SearchArgs {
    /// Text to match against names, descriptions and tags.
    pub query: Option<String>,

    /// Category slug.
    #[arg(long)]
    pub category: Option<String>,

    /// Featured products only.
    #[arg(long)]
    pub featured: bool,

    /// New arrivals only.
    #[arg(long = "new")]
    pub new_arrivals: bool,

    /// Products on sale only.
    #[arg(long)]
    pub sale: bool,

    /// Sort order: relevance, newest, oldest, name-asc, name-desc, price-asc, price-desc.
    #[arg(short, long, default_value = "relevance")]
    pub sort: SortOption,

    /// Page number (1-indexed).
    #[arg(short, long, default_value = "1")]
    pub page: i64,

    /// Results per page.
    #[arg(long, default_value = "24")]
    pub per_page: i64,

    /// Continue after this cursor instead of using page numbers.
    #[arg(long)]
    pub cursor: Option<String>,

    /// Page size when paging by cursor.
    #[arg(long)]
    pub limit: Option<i64>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Write a default storefront.toml in the working directory.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

/// Arguments for the admin command.
#[derive(Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Manage products.
    #[command(subcommand)]
    Product(ProductCommand),
    /// Manage categories.
    #[command(subcommand)]
    Category(CategoryCommand),
}

#[derive(Subcommand)]
pub enum ProductCommand {
    /// List products in every status.
    List {
        /// Page number (1-indexed).
        #[arg(short, long, default_value = "1")]
        page: i64,
    },
    /// Create a product.
    Create(ProductFields),
    /// Update a product. Omitted fields keep their current value.
    Update {
        /// Product slug.
        slug: String,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product.
    Delete {
        /// Product slug.
        slug: String,
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete several products at once.
    BulkDelete {
        /// Product slugs.
        #[arg(required = true)]
        slugs: Vec<String>,
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Product form fields.
#[derive(Args, Default)]
pub struct ProductFields {
    /// Product name. The slug is derived from it.
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Category slug or id.
    #[arg(long)]
    pub category: Option<String>,

    /// Price in major units, e.g. 49.99.
    #[arg(long, allow_negative_numbers = true)]
    pub price: Option<f64>,

    /// Sale price in major units.
    #[arg(long, allow_negative_numbers = true)]
    pub sale_price: Option<f64>,

    /// Remove the sale price.
    #[arg(long, conflicts_with = "sale_price")]
    pub clear_sale_price: bool,

    /// Units in stock.
    #[arg(long, allow_negative_numbers = true)]
    pub stock: Option<i64>,

    /// Image URL. Repeat for several; replaces the current images.
    #[arg(long = "image")]
    pub images: Vec<String>,

    /// draft, published or archived.
    #[arg(long, value_parser = parse_status)]
    pub status: Option<ProductStatus>,

    /// Show in the featured rail (true/false).
    #[arg(long)]
    pub featured: Option<bool>,

    /// Show in the new arrivals rail (true/false).
    #[arg(long = "new")]
    pub new_arrival: Option<bool>,

    /// Show in the sale rail (true/false).
    #[arg(long)]
    pub sale: Option<bool>,

    /// Search tag. Repeat for several; replaces the current tags.
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

fn parse_status(value: &str) -> Result<ProductStatus, String> {
    ProductStatus::parse(value).ok_or_else(|| format!("unknown status '{}'", value))
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// List categories.
    List,
    /// Create a category.
    Create(CategoryFields),
    /// Update a category. Omitted fields keep their current value.
    Update {
        /// Category slug.
        slug: String,
        #[command(flatten)]
        fields: CategoryFields,
    },
    /// Delete a category with no products.
    Delete {
        /// Category slug.
        slug: String,
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Category dialog fields.
#[derive(Args, Default)]
pub struct CategoryFields {
    /// Category name. The slug is derived from it.
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Image URL (http or https).
    #[arg(long)]
    pub image: Option<String>,
}
