//! Cart state and derived totals.

use crate::cart::CartLine;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The lines in a cart, in insertion order.
///
/// Item count and total are derived on every read and never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub lines: Vec<CartLine>,
    pub currency: Currency,
}

impl CartState {
    /// Create an empty cart in `currency`.
    pub fn new(currency: Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
        }
    }

    /// Build a state from persisted lines. Lines sharing a product id are
    /// merged into the first one.
    pub fn from_lines(lines: Vec<CartLine>, currency: Currency) -> Self {
        let mut state = Self::new(currency);
        for line in lines {
            match state.line_mut(&line.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => state.lines.push(line),
            }
        }
        state
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.id == id)
    }

    pub(crate) fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| &l.id == id)
    }

    pub fn is_in_cart(&self, id: &ProductId) -> bool {
        self.line(id).is_some()
    }

    /// Sum of quantities across lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of line totals. Lines priced in another currency are skipped.
    pub fn total_price(&self) -> Money {
        let mut total = Money::zero(self.currency);
        for line in &self.lines {
            let line_total = line.line_total();
            if line_total.currency != self.currency {
                warn!(
                    id = %line.id,
                    expected = self.currency.code(),
                    got = line_total.currency.code(),
                    "skipping cart line priced in another currency"
                );
                continue;
            }
            total = total.saturating_add(line_total);
        }
        total
    }
}
