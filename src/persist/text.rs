//! Text persistence
//!
//! One entry per line: `key<delimiter>value\n`. There is no escaping.
//! Loading splits on the first delimiter, so values may contain it but
//! keys may not, and neither may contain a line break. Entries that
//! break those rules are rejected at save time.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use crate::error::{Result, StoreError};
use crate::table::KeyValueStore;

use super::abort_load;

/// Write every entry of `store` to `path`, truncating the file
///
/// All entries are checked before the file is opened, so an
/// unrepresentable entry leaves any existing file untouched.
pub fn save(store: &KeyValueStore, path: &Path) -> Result<()> {
    let delimiter = store.config().text_delimiter;

    for (key, value) in store {
        check_encodable(key, value, delimiter)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);

    for (key, value) in store {
        writeln!(writer, "{}{}{}", key, delimiter, value)?;
    }
    writer.flush()?;

    tracing::debug!(path = %path.display(), entries = store.len(), "saved text file");
    Ok(())
}

/// Insert every line of `path` into `store`
pub fn load(store: &mut KeyValueStore, path: &Path) -> Result<()> {
    let delimiter = store.config().text_delimiter;
    let reader = BufReader::new(File::open(path)?);
    let mut applied = 0;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;

        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                let err = StoreError::Parse(format!("line {}: not valid UTF-8", line_no));
                return Err(abort_load(path, applied, err));
            }
            Err(e) => return Err(abort_load(path, applied, e.into())),
        };

        let (key, value) = match line.split_once(delimiter) {
            Some(pair) => pair,
            None => {
                let err = StoreError::Parse(format!(
                    "line {}: missing delimiter {:?}",
                    line_no, delimiter
                ));
                return Err(abort_load(path, applied, err));
            }
        };

        if let Err(err) = store.insert(key, value) {
            return Err(abort_load(path, applied, err));
        }
        applied += 1;
    }

    tracing::debug!(path = %path.display(), entries = applied, "loaded text file");
    Ok(())
}

fn check_encodable(key: &str, value: &str, delimiter: char) -> Result<()> {
    if key.contains(delimiter) {
        return Err(StoreError::Encoding(format!(
            "key {:?} contains the delimiter {:?}",
            key, delimiter
        )));
    }

    let has_line_break = |s: &str| s.contains(|c: char| c == '\n' || c == '\r');
    if has_line_break(key) || has_line_break(value) {
        return Err(StoreError::Encoding(format!(
            "entry {:?} contains a line break",
            key
        )));
    }

    Ok(())
}
