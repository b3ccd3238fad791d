//! # chainkv
//!
//! A fixed-bucket hash table for string keys and string values with:
//! - Separate chaining for collisions (insertion order kept per bucket)
//! - Stable FNV-1a hashing
//! - Plain-text (`key=value`) persistence
//! - Length-prefixed binary persistence
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      KeyValueStore                          │
//! │          insert / get / delete / iter / print               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  hash(key) mod table_size
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │   [0] → e → e    [1] → e    [2]    ...    [n-1] → e         │
//! │                 fixed bucket array                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  bucket-then-chain order
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Text     │          │   Binary    │
//!   │ (key=value) │          │ (len-pref.) │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use chainkv::KeyValueStore;
//!
//! # fn main() -> chainkv::Result<()> {
//! let mut store = KeyValueStore::new(10)?;
//! store.insert("name", "John Doe")?;
//! store.save_to_binary_file("data.bin")?;
//!
//! let mut restored = KeyValueStore::new(10)?;
//! restored.load_from_binary_file("data.bin")?;
//! assert_eq!(restored.get("name")?, "John Doe");
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod table;
pub mod persist;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::Config;
pub use table::{Entry, KeyValueStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of chainkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
