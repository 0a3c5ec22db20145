//! Cart commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use serde::Serialize;
use storefront_cache::KvStore;
use storefront_commerce::cart::{CartLine, CartStore, CartSummary};
use storefront_commerce::search::ProductSource;
use storefront_commerce::ProductId;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::truncate;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CartView<'a> {
    lines: &'a [CartLine],
    item_count: u64,
    summary: CartSummary,
}

/// Run the cart command against an opened cart.
pub fn run<S: KvStore>(
    args: CartArgs,
    ctx: &Context,
    catalog: &impl ProductSource,
    cart: &mut CartStore<S>,
) -> Result<()> {
    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => show(ctx, cart),
        CartCommand::Add { slug, quantity } => add(&slug, quantity, ctx, catalog, cart),
        CartCommand::Remove { slug } => remove(&slug, ctx, catalog, cart),
        CartCommand::Set { slug, quantity } => set(&slug, quantity, ctx, catalog, cart),
        CartCommand::Clear { yes } => clear(yes, ctx, cart),
    }
}

fn show<S: KvStore>(ctx: &Context, cart: &CartStore<S>) -> Result<()> {
    let summary = cart.summary();

    if ctx.output.is_json() {
        ctx.output.json(&CartView {
            lines: cart.lines(),
            item_count: cart.item_count(),
            summary,
        });
        return Ok(());
    }

    ctx.output.header("Shopping Cart");
    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }

    let widths = [28, 10, 5, 10, 4];
    ctx.output.table_row(&["Product", "Price", "Qty", "Total", ""], &widths);
    for line in cart.lines() {
        let name = truncate(&line.name, widths[0]);
        let price = line.effective_price().display();
        let quantity = line.quantity.to_string();
        let total = line.line_total().display();
        let sale = if line.is_discounted() { "Sale" } else { "" };
        ctx.output.table_row(&[&name, &price, &quantity, &total, sale], &widths);
    }

    ctx.output.header("Order Summary");
    ctx.output.kv("Items", &cart.item_count().to_string());
    ctx.output.kv("Subtotal", &summary.subtotal.display());
    let shipping = if summary.is_free_shipping() {
        "Free".to_string()
    } else {
        summary.shipping.display()
    };
    ctx.output.kv("Shipping", &shipping);
    ctx.output.kv("Tax", &summary.tax.display());
    ctx.output.kv("Total", &summary.total.display());

    Ok(())
}

fn add<S: KvStore>(
    slug: &str,
    quantity: u32,
    ctx: &Context,
    catalog: &impl ProductSource,
    cart: &mut CartStore<S>,
) -> Result<()> {
    if quantity == 0 {
        bail!("Quantity must be at least 1");
    }

    let product = catalog
        .get_by_slug(slug)
        .with_context(|| format!("No product with slug '{}'", slug))?;

    let stock = product.stock();
    if stock == 0 {
        bail!("{} is out of stock", product.name);
    }
    let in_cart = match cart.line(&product.id) {
        Some(line) if !line.can_increment() => {
            bail!("Your cart already holds all available units of {}", product.name)
        }
        Some(line) => line.quantity,
        None => 0,
    };
    let available = stock.saturating_sub(in_cart);
    if available == 0 {
        bail!("Your cart already holds all {} units of {}", stock, product.name);
    }

    let quantity = if quantity > available {
        ctx.output.warn(&format!(
            "Only {} more unit(s) of {} available",
            available, product.name
        ));
        available
    } else {
        quantity
    };

    cart.add_item(&product, quantity);
    ctx.output.debug(&format!(
        "{} now has {} line(s)",
        cart.key(),
        cart.lines().len()
    ));

    if ctx.output.is_json() {
        ctx.output.json(&cart.line(&product.id));
    }
    Ok(())
}

fn remove<S: KvStore>(
    slug: &str,
    ctx: &Context,
    catalog: &impl ProductSource,
    cart: &mut CartStore<S>,
) -> Result<()> {
    let Some(id) = resolve_line(slug, catalog, cart) else {
        ctx.output.warn(&format!("'{}' is not in your cart", slug));
        return Ok(());
    };

    cart.remove_item(&id);
    ctx.output.success(&format!("Removed {} from cart", slug));
    Ok(())
}

fn set<S: KvStore>(
    slug: &str,
    quantity: u32,
    ctx: &Context,
    catalog: &impl ProductSource,
    cart: &mut CartStore<S>,
) -> Result<()> {
    let Some(id) = resolve_line(slug, catalog, cart) else {
        bail!("'{}' is not in your cart", slug);
    };
    let stock = cart.line(&id).and_then(|l| l.stock);

    let clamped = clamp_quantity(quantity, stock);
    if clamped != quantity {
        ctx.output.warn(&format!(
            "Quantity adjusted to {} (available: {})",
            clamped,
            stock.map_or_else(|| "unlimited".to_string(), |s| s.to_string())
        ));
    }

    cart.update_quantity(&id, clamped);
    ctx.output.success(&format!("Set {} to {}", slug, clamped));
    Ok(())
}

fn clear<S: KvStore>(yes: bool, ctx: &Context, cart: &mut CartStore<S>) -> Result<()> {
    if cart.is_empty() {
        ctx.output.info("Your cart is already empty");
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} item(s) from your cart?", cart.item_count()))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Cart left unchanged");
            return Ok(());
        }
    }

    cart.clear();
    ctx.output.success("Cart cleared");
    Ok(())
}

/// Find the cart line for a slug or product id.
fn resolve_line<S: KvStore>(
    slug: &str,
    catalog: &impl ProductSource,
    cart: &CartStore<S>,
) -> Option<ProductId> {
    if let Some(line) = cart
        .lines()
        .iter()
        .find(|l| l.slug == slug || l.id.as_str() == slug)
    {
        return Some(line.id.clone());
    }

    catalog
        .get_by_slug(slug)
        .ok()
        .map(|p| p.id)
        .filter(|id| cart.is_in_cart(id))
}

/// Keep a quantity between 1 and the stock snapshot, as the cart page does.
fn clamp_quantity(quantity: u32, stock: Option<u32>) -> u32 {
    let max = stock.unwrap_or(u32::MAX).max(1);
    quantity.clamp(1, max)
}
