use crate::models::{KeyValue, Value};
use indexmap::IndexMap;

/// Ordered caller-supplied arguments.
///
/// `None` marks a null value; null entries are skipped during encoding and
/// hashing rather than encoded as a typed null.
pub type Arguments = IndexMap<String, Option<Value>>;

/// Encode an argument map into an ordered list of typed attributes.
///
/// Preserves iteration order and skips null entries. Never fails: the value
/// union is closed, so every non-null entry has exactly one encoding.
pub fn encode_attributes(arguments: &Arguments) -> Vec<KeyValue> {
    arguments
        .iter()
        .filter_map(|(key, value)| {
            value.as_ref().map(|value| KeyValue {
                key: key.clone(),
                value: value.clone(),
            })
        })
        .collect()
}

/// Decode a list of typed attributes back into a mapping.
///
/// `None` and an empty list are treated identically. When a key repeats, the
/// last occurrence wins while the key keeps its first-seen position. Pure and
/// total.
pub fn attrs_to_map(attributes: Option<&[KeyValue]>) -> IndexMap<String, Value> {
    let mut map = IndexMap::new();
    for attribute in attributes.unwrap_or_default() {
        map.insert(attribute.key.clone(), attribute.value.clone());
    }
    map
}
