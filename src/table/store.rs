//! KeyValueStore implementation
//!
//! Fixed-size bucket array with separate chaining.

use std::io::{self, Write};
use std::iter::Flatten;
use std::path::Path;
use std::slice;

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::persist::{binary, text};

use super::{hash, Entry};

/// Hash table mapping string keys to string values
///
/// ## Invariants
/// - `buckets.len()` is fixed at construction and never changes
/// - every entry lives in bucket `hash::bucket_index(key, buckets.len())`
/// - no two entries anywhere in the table share a key
///
/// Not internally synchronized. Wrap it in a `Mutex` to share it
/// between threads.
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    config: Config,

    /// Collision chains, in insertion order
    buckets: Vec<Vec<Entry>>,

    /// Total entries across all chains
    len: usize,
}

impl KeyValueStore {
    /// Create a table with `bucket_count` empty buckets and default settings
    pub fn new(bucket_count: usize) -> Result<Self> {
        Self::with_config(Config::builder().bucket_count(bucket_count).build())
    }

    /// Create a table from a full configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            buckets: vec![Vec::new(); config.bucket_count],
            len: 0,
            config,
        })
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    /// Insert a new key/value pair
    ///
    /// Fails with `KeyAlreadyExists` if the key is present; the existing
    /// value is left untouched. The new entry is appended to the end of
    /// its bucket's chain.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        let index = self.bucket_of(&key);
        let chain = &mut self.buckets[index];

        if chain.iter().any(|entry| entry.key == key) {
            return Err(StoreError::KeyAlreadyExists(key));
        }

        tracing::trace!(bucket = index, chain_len = chain.len(), "insert {:?}", key);

        chain.push(Entry::new(key, value));
        self.len += 1;

        Ok(())
    }

    /// Look up the value stored under `key`
    pub fn get(&self, key: &str) -> Result<&str> {
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
            .ok_or_else(|| StoreError::KeyNotFound(key.to_string()))
    }

    /// Remove `key` and return the value it held
    ///
    /// The remaining entries of the chain keep their relative order.
    pub fn delete(&mut self, key: &str) -> Result<String> {
        let index = self.bucket_of(key);
        let chain = &mut self.buckets[index];

        let position = chain
            .iter()
            .position(|entry| entry.key == key)
            .ok_or_else(|| StoreError::KeyNotFound(key.to_string()))?;

        let removed = chain.remove(position);
        self.len -= 1;

        tracing::trace!(bucket = index, "delete {:?}", key);

        Ok(removed.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_ok()
    }

    // =========================================================================
    // Enumeration
    // =========================================================================

    /// Iterate over all entries, bucket by bucket, each chain in insertion order
    pub fn iter(&self) -> Entries<'_> {
        Entries {
            inner: self.buckets.iter().flatten(),
        }
    }

    /// Write every entry as `[bucket] key: value`, one per line
    pub fn print_to<W: Write>(&self, out: &mut W) -> Result<()> {
        for (index, chain) in self.buckets.iter().enumerate() {
            for entry in chain {
                writeln!(out, "[{}] {}: {}", index, entry.key, entry.value)?;
            }
        }
        out.flush()?;
        Ok(())
    }

    /// Print every entry to stdout
    pub fn print(&self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.print_to(&mut out)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Save all entries to `path` as `key=value` lines, truncating the file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        text::save(self, path.as_ref())
    }

    /// Insert every `key=value` line of `path` into this table
    ///
    /// Not atomic: entries read before a failing line stay inserted.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        text::load(self, path.as_ref())
    }

    /// Save all entries to `path` as length-prefixed binary records
    pub fn save_to_binary_file(&self, path: impl AsRef<Path>) -> Result<()> {
        binary::save(self, path.as_ref())
    }

    /// Insert every binary record of `path` into this table
    ///
    /// Not atomic: records decoded before a failure stay inserted.
    pub fn load_from_binary_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        binary::load(self, path.as_ref())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of buckets (fixed at construction)
    pub fn table_size(&self) -> usize {
        self.buckets.len()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entries per bucket. Reported only; the table never acts on it.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Index of the bucket `key` maps to
    pub fn bucket_of(&self, key: &str) -> usize {
        hash::bucket_index(key, self.buckets.len())
    }

    /// Chain length of bucket `index`, or `None` if out of range
    pub fn bucket_len(&self, index: usize) -> Option<usize> {
        self.buckets.get(index).map(Vec::len)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<'a> IntoIterator for &'a KeyValueStore {
    type Item = (&'a str, &'a str);
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over table entries in bucket-then-chain order
pub struct Entries<'a> {
    inner: Flatten<slice::Iter<'a, Vec<Entry>>>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|entry| (entry.key.as_str(), entry.value.as_str()))
    }
}
