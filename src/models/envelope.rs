use crate::models::{ErrorData, KeyValue, Value};
use serde::{Deserialize, Serialize};

/// Event discriminator carried by error envelopes.
pub const EVENT_ERROR: &str = "error";

/// Key of the string attribute carrying the human-readable summary.
pub const ATTR_ERROR_MESSAGE: &str = "error.message";

/// Key of the opaque attribute carrying the serialized [`ErrorData`].
pub const ATTR_ERROR_OBJECT: &str = "error.object";

/// Type tag identifying an [`ErrorData`] payload inside an opaque attribute.
pub const ERROR_DATA_TYPE_URL: &str = "events.v1.ErrorData";

/// The outermost transport unit for one translated event.
///
/// Built once per translation and consumed read-only by downstream
/// projectors. The envelope shape is shared with non-error events, so
/// projectors use the accessors below and decline silently when an envelope is
/// not theirs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Event discriminator. [`EVENT_ERROR`] for error events.
    pub kind: String,

    /// Event creation time as nanoseconds since the Unix epoch.
    pub time_unix_nano: u64,

    /// Event attributes.
    pub attributes: Vec<KeyValue>,
}

impl Envelope {
    /// The human-readable summary, if this envelope carries one.
    pub fn summary(&self) -> Option<&str> {
        match self.attribute(ATTR_ERROR_MESSAGE)? {
            Value::String(summary) => Some(summary),
            _ => None,
        }
    }

    /// Deserialize the embedded error record.
    ///
    /// Returns `None` when this envelope is not an error event, the record
    /// attribute is missing, or the blob carries an unrecognized type tag.
    /// Never fails loudly: the envelope type is shared with other event kinds.
    pub fn error_data(&self) -> Option<ErrorData> {
        if self.kind != EVENT_ERROR {
            return None;
        }
        let blob = match self.attribute(ATTR_ERROR_OBJECT)? {
            Value::Any(blob) if blob.type_url == ERROR_DATA_TYPE_URL => blob,
            _ => return None,
        };
        serde_json::from_slice(&blob.value).ok()
    }

    fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|attribute| attribute.key == key)
            .map(|attribute| &attribute.value)
    }
}
