//! Cart summary calculations.

use crate::cart::CartState;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Default sales tax: 10%, in basis points.
pub const DEFAULT_TAX_RATE_BPS: u32 = 1000;

/// Order summary shown beside the cart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CartSummary {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Shipping cost. Shipping is currently free.
    pub shipping: Money,
    /// Tax on the subtotal.
    pub tax: Money,
    /// Subtotal plus shipping and tax.
    pub total: Money,
}

impl CartSummary {
    /// Summarize a cart, taxing the subtotal at `tax_rate_bps` basis points.
    pub fn from_state(state: &CartState, tax_rate_bps: u32) -> Self {
        let subtotal = state.total_price();
        let shipping = Money::zero(state.currency);
        let tax = subtotal.basis_points(tax_rate_bps);
        let total = subtotal.saturating_add(shipping).saturating_add(tax);
        Self {
            subtotal,
            shipping,
            tax,
            total,
        }
    }

    pub fn is_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}
