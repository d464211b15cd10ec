use crate::models::StackTrace;
use serde::{Deserialize, Serialize};

/// One exception in a chain.
///
/// Nodes form a chain, not a tree: each node references at most one cause, and
/// the chain is ordered newest first (the originally thrown exception is the
/// head).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionData {
    /// Unique id for this node, fresh per translation. Not a dedup hash.
    pub id: String,

    /// Exception message, when non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Fully-qualified exception type name.
    #[serde(rename = "type")]
    pub type_name: String,

    /// Id of the node representing this exception's cause, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause_id: Option<String>,

    /// Retained stack trace.
    pub stack: StackTrace,
}
