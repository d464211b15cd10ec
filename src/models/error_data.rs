use crate::models::{ExceptionData, KeyValue};
use serde::{Deserialize, Serialize};

/// The canonical record for one translated exception chain.
///
/// Built once per translation and immutable afterwards. The three hashes are
/// 32-character lowercase hex renderings of 128-bit digests:
///
/// - `instance_hash` fingerprints this exact occurrence (head type, top frame,
///   message, caller arguments).
/// - `issue_hash` fingerprints the class of problem (head type and top frame
///   only), so recurring bugs with varying data collapse to one issue. Its
///   digest input is a strict subset of the `instance_hash` input.
/// - `stack_trace_hash` covers the retained frames of the head exception's
///   trace, for correlating truncated renderings of the same trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorData {
    /// Message of the chain head, when non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// The whole chain, head first.
    pub exceptions: Vec<ExceptionData>,

    /// Caller-supplied arguments as typed attributes, in input order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<KeyValue>,

    /// Fingerprint of this exact occurrence.
    pub instance_hash: String,

    /// Fingerprint of the class of problem, for deduplication.
    pub issue_hash: String,

    /// Fingerprint of the head exception's retained frames.
    pub stack_trace_hash: String,
}
