//! Durable key-value slots for the Telly storefront.
//!
//! A slot is a single key in a [`KeyValueStore`]. [`Cache`] wraps a store and
//! serializes values as JSON, so the persisted bytes are the same text a
//! browser would keep in local storage.
//!
//! # Example
//!
//! ```rust
//! use telly_storage::{Cache, MemoryStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Item {
//!     name: String,
//! }
//!
//! let cache = Cache::new(MemoryStore::new());
//! let key = telly_storage::cache_key!("cart", "guest");
//!
//! cache.set(&key, &vec![Item { name: "Ocean Bikini".into() }]).unwrap();
//! let items: Option<Vec<Item>> = cache.get(&key).unwrap();
//! assert_eq!(items.unwrap().len(), 1);
//! ```

mod error;
mod kv;
mod store;

pub use error::StorageError;
pub use kv::Cache;
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, FileStore, KeyValueStore, MemoryStore, StorageError};
}
