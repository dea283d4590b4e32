//! Tests for the exact on-disk byte layout
//!
//! These tests pin the file format byte-for-byte:
//! - 4-byte big-endian entry-count header
//! - 59-byte directory rows (50B key, 1B tag, 4B offset, 4B size)
//! - Value region offsets relative to ref_start = 4 + 59 * N
//! - Zero padding and trailing-NUL trimming of keys

use std::fs;
use std::path::PathBuf;

use flatkv::{Store, Value};
use tempfile::TempDir;

const HEADER_SIZE: usize = 4;
const ROW_SIZE: usize = 59;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.db");
    (temp_dir, path)
}

/// Slice one directory row out of an image
fn row(image: &[u8], index: usize) -> &[u8] {
    let start = HEADER_SIZE + index * ROW_SIZE;
    &image[start..start + ROW_SIZE]
}

fn row_offset(row: &[u8]) -> u32 {
    u32::from_be_bytes(row[51..55].try_into().unwrap())
}

fn row_size(row: &[u8]) -> u32 {
    u32::from_be_bytes(row[55..59].try_into().unwrap())
}

// =============================================================================
// Single-Entry Layout
// =============================================================================

#[test]
fn test_single_entry_layout() {
    let (_temp, path) = setup_temp_store();
    let mut store = Store::open(&path).unwrap();
    store.set(b"cat", "hi").unwrap();

    let image = store.to_bytes().unwrap();
    assert_eq!(image.len(), HEADER_SIZE + ROW_SIZE + 2);

    // Header
    assert_eq!(&image[..4], &[0x00, 0x00, 0x00, 0x01]);

    // Key field: left-justified, zero-padded to 50
    let r = row(&image, 0);
    assert_eq!(&r[..3], b"cat");
    assert!(r[3..50].iter().all(|&b| b == 0));

    // Tag, offset, size
    assert_eq!(r[50], 0x02);
    assert_eq!(row_offset(r), 0);
    assert_eq!(row_size(r), 2);

    // Value region
    assert_eq!(&image[HEADER_SIZE + ROW_SIZE..], b"hi");
}

// =============================================================================
// Directory Order and Offset Arithmetic
// =============================================================================

#[test]
fn test_directory_is_key_sorted() {
    let (_temp, path) = setup_temp_store();
    let mut store = Store::open(&path).unwrap();
    store.set(b"banana", 1i32).unwrap();
    store.set(b"apple", 2i32).unwrap();
    store.set(b"cherry", 3i32).unwrap();

    let image = store.to_bytes().unwrap();
    assert_eq!(&row(&image, 0)[..5], b"apple");
    assert_eq!(&row(&image, 1)[..6], b"banana");
    assert_eq!(&row(&image, 2)[..6], b"cherry");
}

#[test]
fn test_offsets_accumulate_in_row_order() {
    let (_temp, path) = setup_temp_store();
    let mut store = Store::open(&path).unwrap();
    store.set(b"a", "xyz").unwrap(); // 3 bytes at offset 0
    store.set(b"b", 7i32).unwrap(); // 4 bytes at offset 3
    store.set(b"c", 9i64).unwrap(); // 8 bytes at offset 7

    let image = store.to_bytes().unwrap();

    assert_eq!(row_offset(row(&image, 0)), 0);
    assert_eq!(row_size(row(&image, 0)), 3);
    assert_eq!(row_offset(row(&image, 1)), 3);
    assert_eq!(row_size(row(&image, 1)), 4);
    assert_eq!(row_offset(row(&image, 2)), 7);
    assert_eq!(row_size(row(&image, 2)), 8);

    // Each value sits at ref_start + offset
    let ref_start = HEADER_SIZE + 3 * ROW_SIZE;
    assert_eq!(&image[ref_start..ref_start + 3], b"xyz");
    assert_eq!(&image[ref_start + 3..ref_start + 7], &7i32.to_be_bytes()[..]);
    assert_eq!(&image[ref_start + 7..ref_start + 15], &9i64.to_be_bytes()[..]);
}

#[test]
fn test_float_bit_pattern_on_disk() {
    let (_temp, path) = setup_temp_store();
    let mut store = Store::open(&path).unwrap();
    store.set(b"pi", std::f64::consts::PI).unwrap();

    let image = store.to_bytes().unwrap();
    let ref_start = HEADER_SIZE + ROW_SIZE;
    assert_eq!(
        &image[ref_start..],
        &std::f64::consts::PI.to_bits().to_be_bytes()[..]
    );
}

// =============================================================================
// Key Field Semantics
// =============================================================================

#[test]
fn test_trailing_nuls_trimmed_on_read() {
    let (_temp, path) = setup_temp_store();

    // Hand-build an image whose key field is "ab" + 48 NULs
    let mut image = 1u32.to_be_bytes().to_vec();
    let mut row = vec![0u8; ROW_SIZE];
    row[..2].copy_from_slice(b"ab");
    row[50] = 0x00; // i32
    row[55..59].copy_from_slice(&4u32.to_be_bytes());
    image.extend_from_slice(&row);
    image.extend_from_slice(&42i32.to_be_bytes());
    fs::write(&path, image).unwrap();

    let store = Store::open(&path).unwrap();
    assert_eq!(store.get(b"ab").unwrap(), Value::Int32(42));
}

#[test]
fn test_interior_nuls_survive() {
    let (_temp, path) = setup_temp_store();

    let mut store = Store::open(&path).unwrap();
    store.set(b"a\x00b", 1i32).unwrap();
    store.save().unwrap();

    let reloaded = Store::open(&path).unwrap();
    assert_eq!(reloaded.get(b"a\x00b").unwrap(), Value::Int32(1));
}

#[test]
fn test_full_width_key_has_no_padding() {
    let (_temp, path) = setup_temp_store();
    let key = vec![b'x'; 50];

    let mut store = Store::open(&path).unwrap();
    store.set(&key, 1i32).unwrap();

    let image = store.to_bytes().unwrap();
    assert_eq!(&row(&image, 0)[..50], &key[..]);
}
