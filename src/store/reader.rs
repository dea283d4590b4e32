//! Store loader
//!
//! Parses a whole backing-file image into the in-memory map.

use std::collections::HashMap;

use bytes::Bytes;

use crate::config::CorruptionPolicy;
use crate::error::{FlatError, Result};
use crate::value::TypeTag;

use super::directory::{self, DirRow};
use super::{Record, DIR_ROW_SIZE, HEADER_SIZE};

/// Parse a full file image into the entry map
///
/// Empty input means a fresh store. Anything else must carry the 4-byte
/// entry-count header and a complete directory; a file shorter than its own
/// directory is rejected under either corruption policy. Per-row corruption
/// is handled according to `policy` (see `CorruptionPolicy`).
pub(crate) fn parse_bytes(
    bytes: &[u8],
    policy: CorruptionPolicy,
) -> Result<HashMap<Vec<u8>, Record>> {
    let mut entries = HashMap::new();

    if bytes.is_empty() {
        return Ok(entries);
    }

    if bytes.len() < HEADER_SIZE {
        return Err(FlatError::CorruptDirectory(format!(
            "truncated header: {} bytes",
            bytes.len()
        )));
    }

    // Entry-count header, then the fixed-width directory
    let entry_count = u32::from_be_bytes(bytes[..HEADER_SIZE].try_into().unwrap()) as usize;
    let ref_start = HEADER_SIZE + entry_count * DIR_ROW_SIZE;

    if bytes.len() < ref_start {
        return Err(FlatError::CorruptDirectory(format!(
            "directory declares {} entries ({} bytes) but file is {} bytes",
            entry_count,
            ref_start,
            bytes.len()
        )));
    }

    for i in 0..entry_count {
        let row_start = HEADER_SIZE + i * DIR_ROW_SIZE;
        let row = directory::decode_row(&bytes[row_start..row_start + DIR_ROW_SIZE]);

        match parse_row(&row, bytes, ref_start) {
            Ok((key, record)) => {
                entries.insert(key, record);
            }
            Err(RowError::MissingPayload(record)) => {
                // Permissive load keeps the row and drops the undecodable
                // value; get() reports CorruptValue for it
                if policy == CorruptionPolicy::Fail {
                    return Err(FlatError::CorruptDirectory(format!(
                        "row {}: size {} does not match width of type {}",
                        i,
                        record.size,
                        record.tag.name()
                    )));
                }
                tracing::warn!(
                    row = i,
                    size = record.size,
                    tag = record.tag.name(),
                    "registering corrupt fixed-width entry without a value"
                );
                entries.insert(row.key.clone(), record);
            }
            Err(RowError::Unusable(reason)) => {
                if policy == CorruptionPolicy::Fail {
                    return Err(FlatError::CorruptDirectory(format!("row {}: {}", i, reason)));
                }
                tracing::warn!(row = i, %reason, "skipping unusable directory row");
            }
        }
    }

    tracing::debug!(
        declared = entry_count,
        loaded = entries.len(),
        "parsed store image"
    );

    Ok(entries)
}

/// Why a row could not be turned into a complete record
enum RowError {
    /// Row is representable but its value cannot be decoded (size/width
    /// mismatch); carries the payload-less record to register
    MissingPayload(Record),

    /// Row cannot be represented at all
    Unusable(String),
}

/// Interpret a parsed row against the value region
fn parse_row(
    row: &DirRow,
    bytes: &[u8],
    ref_start: usize,
) -> std::result::Result<(Vec<u8>, Record), RowError> {
    if row.key.is_empty() {
        return Err(RowError::Unusable("empty key after NUL trim".to_string()));
    }

    let tag = TypeTag::from_byte(row.tag)
        .map_err(|_| RowError::Unusable(format!("unknown type tag 0x{:02x}", row.tag)))?;

    if let Some(width) = tag.fixed_width() {
        if row.size as usize != width {
            return Err(RowError::MissingPayload(Record {
                tag,
                offset: row.offset,
                size: row.size,
                payload: None,
            }));
        }
    }

    let value_start = ref_start + row.offset as usize;
    let value_end = value_start + row.size as usize;
    if value_end > bytes.len() {
        return Err(RowError::Unusable(format!(
            "value range {}..{} exceeds file length {}",
            value_start,
            value_end,
            bytes.len()
        )));
    }

    let record = Record {
        tag,
        offset: row.offset,
        size: row.size,
        payload: Some(Bytes::copy_from_slice(&bytes[value_start..value_end])),
    };

    Ok((row.key.clone(), record))
}
