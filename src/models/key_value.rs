use serde::{Deserialize, Serialize};

/// A single typed attribute: a key plus a type-tagged value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Attribute name.
    pub key: String,

    /// Attribute value, tagged with its type discriminator.
    #[serde(flatten)]
    pub value: Value,
}

impl KeyValue {
    /// Create an attribute from a key and anything convertible into a [`Value`].
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A typed attribute value.
///
/// This is a closed union. Integral numbers widen to `i64`, fractional numbers
/// to `f64`; anything else is carried as its string representation or as an
/// opaque [`AnyValue`] blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    /// UTF-8 string.
    String(String),
    /// Integer, widest representable range.
    Int(i64),
    /// Floating-point number, double precision.
    Double(f64),
    /// Boolean.
    Bool(bool),
    /// Opaque typed blob.
    Any(AnyValue),
}

/// An opaque typed blob: a type identifier plus serialized bytes.
///
/// Keeps embedded payloads serializable without a polymorphic container. The
/// bytes render as base64 in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnyValue {
    /// Identifies the type of the serialized payload.
    pub type_url: String,

    /// The serialized payload.
    #[serde(with = "base64_bytes")]
    pub value: Vec<u8>,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Double(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<AnyValue> for Value {
    fn from(value: AnyValue) -> Self {
        Value::Any(value)
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
