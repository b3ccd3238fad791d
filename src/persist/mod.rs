//! Persistence Module
//!
//! Saves a table to disk and loads it back by re-inserting every entry.
//!
//! ## Formats
//! - **text**: `key=value` per line (delimiter configurable)
//! - **binary**: length-prefixed records, see [`binary`]
//!
//! Both formats write entries in bucket-then-chain order and rebuild the
//! bucket layout from scratch on load, so a file may be loaded into a
//! table with a different bucket count.
//!
//! ## Partial Loads
//! Loads are not atomic. When a load fails partway (malformed record,
//! duplicate key), the entries applied before the failure remain in the
//! table.

pub mod binary;
pub mod text;

use std::path::Path;

use crate::error::StoreError;

/// Log a load that stopped early and hand the error back
fn abort_load(path: &Path, applied: usize, err: StoreError) -> StoreError {
    tracing::warn!(
        path = %path.display(),
        applied,
        "load aborted, {} entries already inserted: {}",
        applied,
        err
    );
    err
}
