//! Key-value persistence layer for the storefront.
//!
//! Provides a small storage abstraction ([`KvStore`]) with an in-memory and a
//! file-backed implementation, and a typed [`Cache`] wrapper that handles JSON
//! serialization. The cart store mirrors itself into one of these the way a
//! browser storefront mirrors its cart into local storage.
//!
//! # Example
//!
//! ```rust
//! use storefront_cache::{Cache, MemoryStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Line {
//!     id: String,
//!     quantity: u32,
//! }
//!
//! let cache = Cache::new(MemoryStore::new());
//!
//! cache.set("cart", &vec![Line { id: "p1".into(), quantity: 2 }]).unwrap();
//!
//! let lines: Option<Vec<Line>> = cache.get("cart").unwrap();
//! assert_eq!(lines.unwrap()[0].quantity, 2);
//!
//! cache.delete("cart").unwrap();
//! assert!(!cache.exists("cart").unwrap());
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::{Cache, KvStore};
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// use storefront_cache::cache_key;
///
/// let key = cache_key!("cart", "guest");
/// assert_eq!(key, "cart:guest");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
