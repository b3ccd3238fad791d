//! Tests for binary persistence
//!
//! These tests verify:
//! - Exact record layout on disk
//! - Round-trips through files and in-memory buffers
//! - Truncated, negative, and non-UTF-8 records
//! - Partial loads

use std::fs;

use chainkv::persist::binary::{decode_into, encode, LEN_PREFIX_SIZE};
use chainkv::{KeyValueStore, StoreError};

use super::setup_temp_file;

// =============================================================================
// Helper Functions
// =============================================================================

fn record(key: &[u8], value: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&(key.len() as i32).to_le_bytes());
    bytes.extend_from_slice(key);
    bytes.extend_from_slice(&(value.len() as i32).to_le_bytes());
    bytes.extend_from_slice(value);
    bytes
}

fn read_i32_le(bytes: &[u8]) -> i32 {
    i32::from_le_bytes(bytes[..LEN_PREFIX_SIZE].try_into().unwrap())
}

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_save_binary_layout() {
    let (_temp, path) = setup_temp_file("test_data.bin");
    let mut store = KeyValueStore::new(10).unwrap();
    store.insert("name", "John Doe").unwrap();

    store.save_to_binary_file(&path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 4 + 4 + 4 + 8);
    assert_eq!(read_i32_le(&bytes[0..]), 4);
    assert_eq!(&bytes[4..8], b"name");
    assert_eq!(read_i32_le(&bytes[8..]), 8);
    assert_eq!(&bytes[12..20], b"John Doe");
}

#[test]
fn test_lengths_count_utf8_bytes() {
    let mut store = KeyValueStore::new(1).unwrap();
    store.insert("ключ", "é").unwrap();

    let bytes = encode(&store).unwrap();

    assert_eq!(&bytes[..], &record("ключ".as_bytes(), "é".as_bytes())[..]);
    assert_eq!(read_i32_le(&bytes), 8);
}

#[test]
fn test_records_follow_chain_order() {
    let mut store = KeyValueStore::new(1).unwrap();
    store.insert("b", "2").unwrap();
    store.insert("a", "1").unwrap();

    let bytes = encode(&store).unwrap();

    let mut expected = record(b"b", b"2");
    expected.extend(record(b"a", b"1"));
    assert_eq!(&bytes[..], &expected[..]);
}

#[test]
fn test_save_empty_store_creates_empty_file() {
    let (_temp, path) = setup_temp_file("empty.bin");
    let store = KeyValueStore::new(10).unwrap();

    store.save_to_binary_file(&path).unwrap();

    assert!(fs::read(&path).unwrap().is_empty());
}

#[test]
fn test_save_truncates_existing_file() {
    let (_temp, path) = setup_temp_file("test.bin");
    fs::write(&path, vec![0xAB; 256]).unwrap();

    let mut store = KeyValueStore::new(10).unwrap();
    store.insert("k", "v").unwrap();
    store.save_to_binary_file(&path).unwrap();

    assert_eq!(fs::read(&path).unwrap(), record(b"k", b"v"));
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_save_and_load_ten_buckets() {
    let (_temp, path) = setup_temp_file("test_data.bin");
    let mut store = KeyValueStore::new(10).unwrap();
    store.insert("key1", "value1").unwrap();
    store.insert("key2", "value2").unwrap();

    store.save_to_binary_file(&path).unwrap();

    let mut loaded = KeyValueStore::new(10).unwrap();
    loaded.load_from_binary_file(&path).unwrap();

    assert_eq!(loaded.get("key1").unwrap(), "value1");
    assert_eq!(loaded.get("key2").unwrap(), "value2");
    assert_eq!(loaded.len(), 2);
}

#[test]
fn test_values_with_newlines_and_delimiters_round_trip() {
    let (_temp, path) = setup_temp_file("test.bin");
    let mut store = KeyValueStore::new(4).unwrap();
    store.insert("a=b", "line one\nline two\r\n").unwrap();
    store.insert("", "").unwrap();

    store.save_to_binary_file(&path).unwrap();
    let mut loaded = KeyValueStore::new(4).unwrap();
    loaded.load_from_binary_file(&path).unwrap();

    assert_eq!(loaded.get("a=b").unwrap(), "line one\nline two\r\n");
    assert_eq!(loaded.get("").unwrap(), "");
}

#[test]
fn test_many_entries_round_trip_into_other_bucket_count() {
    let mut store = KeyValueStore::new(13).unwrap();
    for i in 0..1000 {
        store.insert(format!("key{}", i), format!("value{}", i)).unwrap();
    }

    let bytes = encode(&store).unwrap();
    let mut loaded = KeyValueStore::new(5).unwrap();
    let applied = decode_into(&mut loaded, &bytes).unwrap();

    assert_eq!(applied, 1000);
    for i in 0..1000 {
        assert_eq!(loaded.get(&format!("key{}", i)).unwrap(), format!("value{}", i));
    }
}

#[test]
fn test_decode_empty_input() {
    let mut store = KeyValueStore::new(10).unwrap();

    assert_eq!(decode_into(&mut store, &[]).unwrap(), 0);
    assert!(store.is_empty());
}

// =============================================================================
// Malformed Input Tests
// =============================================================================

#[test]
fn test_load_missing_file_fails_with_io() {
    let (_temp, path) = setup_temp_file("nope.bin");
    let mut store = KeyValueStore::new(10).unwrap();

    assert!(matches!(
        store.load_from_binary_file(&path),
        Err(StoreError::Io(_))
    ));
}

#[test]
fn test_length_exceeding_remaining_bytes() {
    let mut bytes = record(b"ok", b"fine");
    bytes.extend_from_slice(&100i32.to_le_bytes());
    bytes.extend_from_slice(b"short");

    let mut store = KeyValueStore::new(10).unwrap();
    let result = decode_into(&mut store, &bytes);

    match result {
        Err(StoreError::Parse(msg)) => assert!(msg.contains("byte 14"), "{}", msg),
        other => panic!("expected Parse, got {:?}", other),
    }
    // Entries before the bad record are kept
    assert_eq!(store.get("ok").unwrap(), "fine");
    assert_eq!(store.len(), 1);
}

#[test]
fn test_truncated_length_prefix() {
    let mut bytes = record(b"k", b"v");
    bytes.extend_from_slice(&[0x02, 0x00]);

    let mut store = KeyValueStore::new(10).unwrap();

    assert!(matches!(
        decode_into(&mut store, &bytes),
        Err(StoreError::Parse(_))
    ));
    assert_eq!(store.get("k").unwrap(), "v");
}

#[test]
fn test_missing_value_after_key() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&3i32.to_le_bytes());
    bytes.extend_from_slice(b"key");

    let mut store = KeyValueStore::new(10).unwrap();

    assert!(matches!(
        decode_into(&mut store, &bytes),
        Err(StoreError::Parse(_))
    ));
    assert!(store.is_empty());
}

#[test]
fn test_truncated_value() {
    let mut bytes = record(b"key", b"value");
    bytes.truncate(bytes.len() - 2);

    let mut store = KeyValueStore::new(10).unwrap();

    assert!(matches!(
        decode_into(&mut store, &bytes),
        Err(StoreError::Parse(_))
    ));
    assert!(store.is_empty());
}

#[test]
fn test_negative_length() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&(-1i32).to_le_bytes());
    bytes.extend_from_slice(b"anything");

    let mut store = KeyValueStore::new(10).unwrap();

    match decode_into(&mut store, &bytes) {
        Err(StoreError::Parse(msg)) => assert!(msg.contains("negative"), "{}", msg),
        other => panic!("expected Parse, got {:?}", other),
    }
}

#[test]
fn test_invalid_utf8_key() {
    let bytes = record(&[0xff, 0xfe], b"value");
    let mut store = KeyValueStore::new(10).unwrap();

    assert!(matches!(
        decode_into(&mut store, &bytes),
        Err(StoreError::Parse(_))
    ));
}

#[test]
fn test_duplicate_record_stops_load() {
    let (_temp, path) = setup_temp_file("dup.bin");
    let mut bytes = record(b"a", b"1");
    bytes.extend(record(b"a", b"2"));
    bytes.extend(record(b"b", b"3"));
    fs::write(&path, &bytes).unwrap();

    let mut store = KeyValueStore::new(10).unwrap();
    let result = store.load_from_binary_file(&path);

    assert!(matches!(result, Err(StoreError::KeyAlreadyExists(_))));
    assert_eq!(store.get("a").unwrap(), "1");
    assert!(!store.contains_key("b"));
}

#[test]
fn test_load_into_non_empty_table_with_colliding_key() {
    let (_temp, path) = setup_temp_file("test.bin");
    let mut source = KeyValueStore::new(10).unwrap();
    source.insert("shared", "from file").unwrap();
    source.save_to_binary_file(&path).unwrap();

    let mut target = KeyValueStore::new(10).unwrap();
    target.insert("shared", "original").unwrap();

    assert!(matches!(
        target.load_from_binary_file(&path),
        Err(StoreError::KeyAlreadyExists(_))
    ));
    assert_eq!(target.get("shared").unwrap(), "original");
}
