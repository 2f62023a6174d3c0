//! versioned-kv: in-memory time-versioned key-value store
//!
//! Every key keeps a history of `(timestamp, value)` versions ordered by
//! timestamp. Writes may arrive out of order; reads answer "what was the
//! value of this key as of time T".
//!
//! # Core Concepts
//!
//! - **Version**: a value and the timestamp from which it is effective
//! - **History**: all versions retained for one key, strictly ordered
//! - **Point-in-time read**: the version at or before a given timestamp
//! - **Retention**: dropping versions up to a timestamp or beyond a count
//! - **Compaction**: count retention plus collapsing repeated values
//!
//! # Example
//!
//! ```
//! use versioned_kv::prelude::*;
//!
//! let mut store = VersionedStore::new();
//! store.insert(1, "a", "apple");
//! store.insert(5, "a", "avocado");
//! store.insert(4, "a", "anchovy");
//!
//! assert_eq!(store.get(3, "a"), Some(&"apple"));
//! assert_eq!(store.get(4, "a"), Some(&"anchovy"));
//! assert_eq!(store.latest("a"), Some(&"avocado"));
//! assert_eq!(store.delete_upto("a", 1), 1);
//! ```

pub mod cli;
pub mod compaction;
pub mod config;
pub mod core;
pub mod error;

/// Main store type
pub mod store;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::compaction::CompactOptions;
    pub use crate::core::*;
    pub use crate::error::{Error, Result};
    pub use crate::store::VersionedStore;
}
