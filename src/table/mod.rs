//! Table Module
//!
//! The in-memory hash table.
//!
//! ## Responsibilities
//! - Map each key to exactly one bucket via a stable hash
//! - Resolve collisions by chaining within the bucket
//! - Reject duplicate keys on insert
//! - Enumerate entries in bucket-then-chain order
//!
//! ## Data Structure Choice
//! A `Vec` of `Vec<Entry>` buckets, sized once at construction:
//! - Chains preserve insertion order (persistence writes that order)
//! - No rehashing: the bucket count is a configuration choice, and
//!   heavy load degrades lookups to a linear chain scan

pub mod hash;
mod store;

pub use store::{Entries, KeyValueStore};

/// A single key/value pair stored in a bucket chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
