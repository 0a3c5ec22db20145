//! Product listing and search.
//!
//! [`ListingQuery`] describes what the storefront asks for; a
//! [`ProductSource`] answers it with a [`Listing`].

mod filter;
mod query;
mod results;
mod source;

pub use filter::Filter;
pub use query::{ListingQuery, PageRequest, SortOption};
pub use results::{Listing, Pagination};
pub use source::{ProductSource, RAIL_LIMIT, RELATED_LIMIT};
