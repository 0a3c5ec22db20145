//! Shopping cart module.
//!
//! Contains cart lines, derived totals, the order summary, and the
//! persisted [`CartStore`] with its change notifications.

mod events;
mod line;
mod pricing;
mod state;
mod store;

pub use events::{CartEvent, SubscriptionId};
pub use line::{CartLine, CartProduct};
pub use pricing::{CartSummary, DEFAULT_TAX_RATE_BPS};
pub use state::CartState;
pub use store::{CartStore, DEFAULT_CART_KEY};
