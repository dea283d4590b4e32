//! Record definition
//!
//! One key's entry in the store: its type tag, value-region offset, size,
//! and the encoded value bytes.

use bytes::Bytes;

use crate::error::{FlatError, Result};
use crate::value::{self, TypeTag, Value};

/// A single store entry
#[derive(Debug, Clone)]
pub struct Record {
    /// Value type tag
    pub tag: TypeTag,

    /// Byte offset of the value within the value region (0-based, relative
    /// to the region start, not the file). Recomputed on every save; records
    /// created in memory hold 0 until then.
    pub offset: u32,

    /// Byte count of the encoded value
    pub size: u32,

    /// Encoded value bytes, exactly `size` long. `None` for a corrupt
    /// directory row carried through a permissive load — such a record has
    /// a tag and size but no decodable value.
    pub payload: Option<Bytes>,
}

impl Record {
    /// Build a record from a value (offset is assigned at save time)
    pub fn from_value(value: &Value) -> Self {
        let payload = value::encode(value);
        Self {
            tag: value.tag(),
            offset: 0,
            size: payload.len() as u32,
            payload: Some(payload),
        }
    }

    /// Decode the payload back into a typed value
    ///
    /// Fails with `CorruptValue` when the payload is absent (permissively
    /// loaded corrupt row) or mis-sized for the tag.
    pub fn decode_value(&self) -> Result<Value> {
        match &self.payload {
            Some(payload) => value::decode(self.tag, payload),
            None => Err(FlatError::CorruptValue {
                expected: self.tag.fixed_width().unwrap_or(self.size as usize),
                got: 0,
            }),
        }
    }
}
