//! Directory rows
//!
//! Encoding and decoding of the fixed 59-byte directory rows that precede
//! the value region, plus key validation.

use bytes::{BufMut, BytesMut};

use crate::error::{FlatError, Result};

use super::{DIR_ROW_SIZE, KEY_FIELD_SIZE, MAX_KEY_LEN};

/// A parsed directory row
///
/// The tag is kept as its raw byte here; interpreting it (and deciding what
/// to do with an unknown tag) is the loader's job.
#[derive(Debug, Clone)]
pub struct DirRow {
    /// Key bytes with trailing NULs trimmed
    pub key: Vec<u8>,
    /// Raw type tag byte
    pub tag: u8,
    /// Offset of the value within the value region
    pub offset: u32,
    /// Size of the value in bytes
    pub size: u32,
}

/// Validate a key against the format's length constraints
///
/// Keys must be 1..=50 bytes. Checked at `set` time and again when rows are
/// emitted, so a store can never serialize an unrepresentable key.
pub fn validate_key(key: &[u8]) -> Result<()> {
    if key.is_empty() {
        return Err(FlatError::InvalidKey);
    }
    if key.len() > MAX_KEY_LEN {
        return Err(FlatError::KeyTooLong {
            len: key.len(),
            max: MAX_KEY_LEN,
        });
    }
    Ok(())
}

/// Append one 59-byte directory row to `buf`
///
/// Layout: key (50 bytes, zero-padded) | tag (1) | offset (4, BE) | size (4, BE)
pub fn encode_row(buf: &mut BytesMut, key: &[u8], tag: u8, offset: u32, size: u32) -> Result<()> {
    validate_key(key)?;

    buf.put_slice(key);
    buf.put_bytes(0, KEY_FIELD_SIZE - key.len());
    buf.put_u8(tag);
    buf.put_u32(offset);
    buf.put_u32(size);

    Ok(())
}

/// Parse one directory row
///
/// `row` must be exactly `DIR_ROW_SIZE` bytes; the caller slices the
/// directory region into rows.
pub fn decode_row(row: &[u8]) -> DirRow {
    debug_assert_eq!(row.len(), DIR_ROW_SIZE);

    let key_field = &row[..KEY_FIELD_SIZE];
    let key_len = key_field
        .iter()
        .rposition(|&b| b != 0)
        .map(|i| i + 1)
        .unwrap_or(0);

    DirRow {
        key: key_field[..key_len].to_vec(),
        tag: row[KEY_FIELD_SIZE],
        offset: u32::from_be_bytes(row[51..55].try_into().unwrap()),
        size: u32::from_be_bytes(row[55..59].try_into().unwrap()),
    }
}
