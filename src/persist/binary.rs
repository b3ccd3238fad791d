//! Binary persistence
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Record 1                                                 │
//! │ ┌────────────┬───────┬──────────────┬─────────┐          │
//! │ │KeyLen i32LE│  Key  │ValueLen i32LE│  Value  │          │
//! │ └────────────┴───────┴──────────────┴─────────┘          │
//! ├──────────────────────────────────────────────────────────┤
//! │ Record 2 ...                                             │
//! └──────────────────────────────────────────────────────────┘
//! ```
//! Lengths are byte counts of the UTF-8 encoding. No header, no record
//! separator, no count, no footer, no checksum. End of input exactly at a
//! record boundary ends the stream.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, StoreError};
use crate::table::KeyValueStore;

use super::abort_load;

/// Size of each length prefix
pub const LEN_PREFIX_SIZE: usize = 4;

// =============================================================================
// Encoding
// =============================================================================

/// Encode every entry of `store` as consecutive records
pub fn encode(store: &KeyValueStore) -> Result<Bytes> {
    let mut buf = BytesMut::new();

    for (key, value) in store {
        put_field(&mut buf, key, "key", key)?;
        put_field(&mut buf, value, "value", key)?;
    }

    Ok(buf.freeze())
}

fn put_field(buf: &mut BytesMut, field: &str, kind: &str, key: &str) -> Result<()> {
    let len = i32::try_from(field.len()).map_err(|_| {
        StoreError::Encoding(format!(
            "{} of entry {:?} is {} bytes, over the i32 length limit",
            kind,
            key,
            field.len()
        ))
    })?;

    buf.reserve(LEN_PREFIX_SIZE + field.len());
    buf.put_i32_le(len);
    buf.put_slice(field.as_bytes());
    Ok(())
}

/// Encode `store` and write it to `path`, truncating the file
///
/// Encoding happens in memory first, so an unrepresentable entry leaves
/// any existing file untouched.
pub fn save(store: &KeyValueStore, path: &Path) -> Result<()> {
    let data = encode(store)?;

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    file.write_all(&data)?;
    file.flush()?;

    tracing::debug!(
        path = %path.display(),
        entries = store.len(),
        bytes = data.len(),
        "saved binary file"
    );
    Ok(())
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode records from `data` and insert them into `store`
///
/// Returns the number of entries inserted. Entries decoded before an
/// error remain in `store`.
pub fn decode_into(store: &mut KeyValueStore, data: &[u8]) -> Result<usize> {
    let mut applied = 0;
    decode_records(store, data, &mut applied)?;
    Ok(applied)
}

/// Read `path` and insert every record into `store`
pub fn load(store: &mut KeyValueStore, path: &Path) -> Result<()> {
    let data = fs::read(path)?;
    let mut applied = 0;

    if let Err(err) = decode_records(store, &data, &mut applied) {
        return Err(abort_load(path, applied, err));
    }

    tracing::debug!(
        path = %path.display(),
        entries = applied,
        bytes = data.len(),
        "loaded binary file"
    );
    Ok(())
}

fn decode_records(store: &mut KeyValueStore, data: &[u8], applied: &mut usize) -> Result<()> {
    let mut buf = data;

    while buf.has_remaining() {
        let offset = data.len() - buf.remaining();

        let key = take_field(&mut buf, offset, "key")?;
        if !buf.has_remaining() {
            return Err(StoreError::Parse(format!(
                "record at byte {}: value missing after key {:?}",
                offset, key
            )));
        }
        let value = take_field(&mut buf, offset, "value")?;

        store.insert(key, value)?;
        *applied += 1;
    }

    Ok(())
}

/// Read one `[len][bytes]` field of the record starting at `offset`
fn take_field(buf: &mut &[u8], offset: usize, kind: &str) -> Result<String> {
    if buf.remaining() < LEN_PREFIX_SIZE {
        return Err(StoreError::Parse(format!(
            "record at byte {}: truncated {} length prefix ({} of {} bytes)",
            offset,
            kind,
            buf.remaining(),
            LEN_PREFIX_SIZE
        )));
    }

    let raw_len = buf.get_i32_le();
    let len = usize::try_from(raw_len).map_err(|_| {
        StoreError::Parse(format!(
            "record at byte {}: negative {} length {}",
            offset, kind, raw_len
        ))
    })?;

    if len > buf.remaining() {
        return Err(StoreError::Parse(format!(
            "record at byte {}: {} length {} exceeds the {} bytes remaining",
            offset,
            kind,
            len,
            buf.remaining()
        )));
    }

    let bytes = buf.copy_to_bytes(len);
    std::str::from_utf8(&bytes)
        .map(str::to_owned)
        .map_err(|e| {
            StoreError::Parse(format!(
                "record at byte {}: {} is not valid UTF-8: {}",
                offset, kind, e
            ))
        })
}
