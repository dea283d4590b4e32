//! Value codec
//!
//! Encoding and decoding functions for typed values.
//!
//! ## Wire Format
//!
//! All numeric types are big-endian:
//! - Int32:   4 bytes, two's-complement
//! - Int64:   8 bytes, two's-complement
//! - Float32: 4 bytes, IEEE-754 single-precision bit pattern
//! - Float64: 8 bytes, IEEE-754 double-precision bit pattern
//! - Str:     UTF-8 bytes, length determined by the directory row
//!
//! Floats are stored as raw bit patterns, so round-trips are exact (NaN
//! payloads included).

use bytes::Bytes;

use crate::error::{FlatError, Result};

use super::{TypeTag, Value};

/// Encode a value to its canonical byte form
///
/// Infallible: `Value` is a closed enum, so every variant has an encoding.
pub fn encode(value: &Value) -> Bytes {
    match value {
        Value::Int32(v) => Bytes::copy_from_slice(&v.to_be_bytes()),
        Value::Int64(v) => Bytes::copy_from_slice(&v.to_be_bytes()),
        Value::Str(s) => Bytes::copy_from_slice(s.as_bytes()),
        Value::Float32(v) => Bytes::copy_from_slice(&v.to_bits().to_be_bytes()),
        Value::Float64(v) => Bytes::copy_from_slice(&v.to_bits().to_be_bytes()),
    }
}

/// Decode a value from its canonical byte form
///
/// Fails with `CorruptValue` when `bytes` does not match the tag's fixed
/// width. `Str` accepts any length; invalid UTF-8 is replaced rather than
/// rejected, since the format stores raw bytes.
pub fn decode(tag: TypeTag, bytes: &[u8]) -> Result<Value> {
    if let Some(width) = tag.fixed_width() {
        if bytes.len() != width {
            return Err(FlatError::CorruptValue {
                expected: width,
                got: bytes.len(),
            });
        }
    }

    match tag {
        TypeTag::Int32 => {
            let raw: [u8; 4] = bytes.try_into().unwrap();
            Ok(Value::Int32(i32::from_be_bytes(raw)))
        }
        TypeTag::Int64 => {
            let raw: [u8; 8] = bytes.try_into().unwrap();
            Ok(Value::Int64(i64::from_be_bytes(raw)))
        }
        TypeTag::Str => Ok(Value::Str(
            String::from_utf8_lossy(bytes).into_owned(),
        )),
        TypeTag::Float32 => {
            let raw: [u8; 4] = bytes.try_into().unwrap();
            Ok(Value::Float32(f32::from_bits(u32::from_be_bytes(raw))))
        }
        TypeTag::Float64 => {
            let raw: [u8; 8] = bytes.try_into().unwrap();
            Ok(Value::Float64(f64::from_bits(u64::from_be_bytes(raw))))
        }
    }
}
