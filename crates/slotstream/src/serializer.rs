use serde_json::Value;

use crate::error::Result;

/// Converts structured values to and from the byte strings the chunker
/// splits.
///
/// Implementations must be deterministic and byte-exact round-trip
/// (`deserialize(serialize(v)) == v`) so the XOR integrity check over the
/// serialized form is meaningful.
pub trait Serializer {
    fn serialize(&self, value: &Value) -> Result<Vec<u8>>;
    fn deserialize(&self, bytes: &[u8]) -> Result<Value>;
}

/// The default serializer: compact JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, value: &Value) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
