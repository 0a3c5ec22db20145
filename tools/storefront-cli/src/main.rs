//! Storefront CLI - browse the catalog and manage a persisted cart.
//!
//! Commands:
//! - `storefront catalog` - Browse, search and export products
//! - `storefront cart` - Show and change the cart
//! - `storefront admin` - Edit products and categories in the catalog file
//! - `storefront config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use storefront_commerce::cart::CartEvent;
use tracing_subscriber::EnvFilter;

use commands::{AdminArgs, CartArgs, CatalogArgs, ConfigArgs};
use context::Context;

/// Environment variable overriding the configured log filter.
const LOG_ENV: &str = "STOREFRONT_LOG";

/// Storefront CLI - browse products and manage your cart
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Cart profile, stored under its own key
    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and search the catalog
    Catalog(CatalogArgs),

    /// Show and change the cart
    Cart(CartArgs),

    /// Edit products and categories in the catalog file
    Admin(AdminArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = Context::load(cli.config.as_deref(), cli.profile.clone(), output)?;
    init_tracing(&ctx.config.log_level, cli.verbose);

    if let Err(e) = run(cli.command, &ctx) {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn run(command: Commands, ctx: &Context) -> Result<()> {
    match command {
        Commands::Catalog(args) => {
            let catalog = ctx.load_catalog()?;
            commands::catalog::run(args, ctx, &catalog)
        }
        Commands::Cart(args) => {
            let catalog = ctx.load_catalog()?;
            let mut cart = ctx.open_cart()?;

            let output = ctx.output;
            cart.subscribe(move |event| {
                if let CartEvent::Added { .. } = event {
                    output.success(&event.message());
                }
            });

            commands::cart::run(args, ctx, &catalog, &mut cart)
        }
        Commands::Admin(args) => commands::admin::run(args, ctx),
        Commands::Config(args) => commands::config::run(args, ctx),
    }
}

/// Log to stderr. `STOREFRONT_LOG` wins over the configured level, and
/// `--verbose` raises the default to `debug`.
fn init_tracing(log_level: &str, verbose: bool) {
    let default = if verbose { "debug" } else { log_level };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
