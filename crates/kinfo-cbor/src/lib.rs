//! Canonical CBOR helpers used to persist kernel data.

use serde::{Serialize, de::DeserializeOwned};
use serde_cbor::ser::Write as CborWrite;

pub use serde_cbor::Error as CodecError;
pub use serde_cbor::value::Value;

/// Encode `value` as the bytes of a kernel data file.
///
/// The output starts with the CBOR self-describe tag. Map keys come out
/// sorted because the value passes through a [`Value`] tree first.
pub fn to_canonical_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    encode_into(value, &mut out)?;
    Ok(out)
}

/// Append the canonical encoding of `value` to `sink`.
pub fn encode_into<T, W>(value: &T, sink: W) -> Result<(), CodecError>
where
    T: Serialize,
    W: CborWrite,
{
    let tree = to_value(value)?;
    let mut encoder = serde_cbor::ser::Serializer::new(sink);
    encoder.self_describe()?;
    tree.serialize(&mut encoder)
}

/// Decode CBOR bytes into an untyped value tree.
pub fn from_cbor_slice(bytes: &[u8]) -> Result<Value, CodecError> {
    serde_cbor::from_slice(bytes)
}

/// Lower any serializable value into a CBOR value tree.
pub fn to_value<T: Serialize>(value: &T) -> Result<Value, CodecError> {
    serde_cbor::value::to_value(value)
}

/// Rebuild a typed value from a CBOR value tree.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, CodecError> {
    serde_cbor::value::from_value(value)
}

/// Human-readable name of a value's top-level shape, for diagnostics.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Integer(_) => "integer",
        Value::Float(_) => "float",
        Value::Bytes(_) => "byte string",
        Value::Text(_) => "text",
        Value::Array(_) => "array",
        Value::Map(_) => "map",
        Value::Tag(_, _) => "tagged value",
        _ => "unknown",
    }
}
