//! Store writer
//!
//! Serializes the in-memory map to the full file image and persists it.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use bytes::{BufMut, BytesMut};
use tempfile::NamedTempFile;

use crate::config::WriteStrategy;
use crate::error::Result;

use super::{directory, Record, DIR_ROW_SIZE, HEADER_SIZE};

/// Serialize the entry map to the full file image
///
/// Layout: entry-count header, directory rows, concatenated value bytes.
/// Rows are emitted in ascending key order so an unchanged store always
/// serializes to identical bytes. Offsets are assigned by a running
/// accumulator as values are appended.
pub(crate) fn serialize(entries: &HashMap<Vec<u8>, Record>) -> Result<Vec<u8>> {
    // Sorted emission order; corrupt payload-less records have no bytes to
    // write and are left out of the image
    let mut keys: Vec<&Vec<u8>> = entries.keys().collect();
    keys.sort();

    let mut emitted: Vec<(&Vec<u8>, &Record, &[u8])> = Vec::with_capacity(keys.len());
    for key in keys {
        let record = &entries[key];
        match &record.payload {
            Some(payload) => emitted.push((key, record, payload.as_ref())),
            None => {
                tracing::warn!(
                    key = %String::from_utf8_lossy(key),
                    "dropping corrupt entry with no value from save"
                );
            }
        }
    }

    let values_len: usize = emitted.iter().map(|(_, _, payload)| payload.len()).sum();
    let mut image =
        BytesMut::with_capacity(HEADER_SIZE + emitted.len() * DIR_ROW_SIZE + values_len);

    image.put_u32(emitted.len() as u32);

    // Directory rows, then the value region, sharing one running offset
    let mut next_offset: u32 = 0;
    let mut values = BytesMut::with_capacity(values_len);
    for (key, record, payload) in emitted {
        directory::encode_row(&mut image, key, record.tag.as_byte(), next_offset, record.size)?;
        values.put_slice(payload);
        next_offset += record.size;
    }

    image.unsplit(values);

    Ok(image.to_vec())
}

/// Write the serialized image to the backing file
pub(crate) fn write_file(path: &Path, image: &[u8], strategy: WriteStrategy) -> Result<()> {
    match strategy {
        WriteStrategy::AtomicRename => write_atomic(path, image),
        WriteStrategy::InPlace => write_in_place(path, image),
    }
}

/// Write via temp file + fsync + rename
///
/// A crash at any point leaves either the old file or the new one, never a
/// partial image.
fn write_atomic(path: &Path, image: &[u8]) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new_in(".")?,
    };

    tmp.write_all(image)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    tracing::debug!(path = %path.display(), bytes = image.len(), "saved store (atomic rename)");
    Ok(())
}

/// Truncate the target and write directly
fn write_in_place(path: &Path, image: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    file.write_all(image)?;
    file.sync_all()?;

    tracing::debug!(path = %path.display(), bytes = image.len(), "saved store (in place)");
    Ok(())
}
