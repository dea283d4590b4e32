//! Store Module
//!
//! The in-memory key-value map and its whole-file persistence.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (4 bytes)                                        │
//! │   EntryCount: u32 (big-endian)                          │
//! ├─────────────────────────────────────────────────────────┤
//! │ Directory (59 bytes per entry)                          │
//! │   [Key: 50, zero-padded][Tag: u8][Offset: u32][Size: u32]│
//! │   ... repeated EntryCount times ...                     │
//! ├─────────────────────────────────────────────────────────┤
//! │ Value Region (variable)                                 │
//! │   concatenated value bytes, addressed by (Offset, Size) │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Offsets are relative to the start of the value region, which begins
//! immediately after the last directory row: `ref_start = 4 + 59 * N`.

mod directory;
mod reader;
mod record;
mod writer;

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{FlatError, Result};
use crate::value::Value;

pub use record::Record;

// =============================================================================
// Shared Constants (used by directory, reader, writer)
// =============================================================================

/// Header size: EntryCount (4) = 4 bytes
pub(crate) const HEADER_SIZE: usize = 4;

/// Directory row size: Key (50) + Tag (1) + Offset (4) + Size (4) = 59 bytes
pub(crate) const DIR_ROW_SIZE: usize = 59;

/// Width of the zero-padded key field in a directory row
pub(crate) const KEY_FIELD_SIZE: usize = 50;

/// Maximum key length in bytes (the key field width)
pub const MAX_KEY_LEN: usize = 50;

// =============================================================================
// Store
// =============================================================================

/// An in-memory key-value store backed by a single flat file
///
/// The whole dataset lives in the map; `open` deserializes the backing file
/// wholesale and `save` rewrites it wholesale. Nothing is persisted until
/// `save` is called.
///
/// Single-threaded by design: callers needing concurrent access must wrap
/// the store in their own exclusion boundary.
pub struct Store {
    /// Backing file path
    path: PathBuf,

    /// Load/save policy knobs
    config: Config,

    /// Live entries; key uniqueness by map semantics
    entries: HashMap<Vec<u8>, Record>,
}

impl Store {
    /// Open a store with the default config
    ///
    /// Creates an empty backing file if the path does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, Config::default())
    }

    /// Open a store with an explicit config
    ///
    /// On startup:
    /// 1. Read the whole backing file (create it empty if absent)
    /// 2. Parse the directory and slice out every value
    /// 3. Ready to serve get/set
    pub fn open_with_config(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // Missing file is "new store": create the empty target now
                // so the path exists for the first save
                fs::File::create(&path)?;
                tracing::debug!(path = %path.display(), "created empty backing file");
                Vec::new()
            }
            Err(e) => return Err(FlatError::Io(e)),
        };

        let entries = reader::parse_bytes(&bytes, config.corruption_policy)?;

        tracing::debug!(
            path = %path.display(),
            entries = entries.len(),
            "opened store"
        );

        Ok(Self {
            path,
            config,
            entries,
        })
    }

    /// Get a value by key
    ///
    /// Fails with `KeyNotFound` for absent keys and `CorruptValue` for
    /// entries whose payload could not be loaded or decoded.
    pub fn get(&self, key: &[u8]) -> Result<Value> {
        match self.entries.get(key) {
            Some(record) => record.decode_value(),
            None => Err(FlatError::KeyNotFound),
        }
    }

    /// Set a key to a value, replacing any previous entry
    ///
    /// Purely in-memory; the new record's offset stays 0 until the next
    /// save assigns real offsets. Fails with `InvalidKey`/`KeyTooLong` on
    /// keys the format cannot represent.
    pub fn set(&mut self, key: &[u8], value: impl Into<Value>) -> Result<()> {
        directory::validate_key(key)?;

        let record = Record::from_value(&value.into());
        self.entries.insert(key.to_vec(), record);

        Ok(())
    }

    /// Serialize and write the whole store to the backing file
    ///
    /// The image is built fully in memory, then persisted per the
    /// configured write strategy.
    pub fn save(&self) -> Result<()> {
        let image = self.to_bytes()?;
        writer::write_file(&self.path, &image, self.config.write_strategy)
    }

    /// Serialize the store to its full file image without writing it
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        writer::serialize(&self.entries)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of live entries
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a key is present (corrupt payload-less entries included)
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over all keys (unordered)
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.keys().map(|k| k.as_slice())
    }

    /// Look up a key's record (tag/offset/size metadata)
    pub fn record(&self, key: &[u8]) -> Option<&Record> {
        self.entries.get(key)
    }

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
