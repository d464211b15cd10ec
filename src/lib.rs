//! Canonical, hash-stable error event records from exception chains.
//!
//! This crate captures a runtime exception, possibly with a chain of nested
//! causes, and canonicalizes it into a structured, size-bounded error record
//! wrapped in a transport [`Envelope`]. Backend-specific projectors (crash
//! reporters, error trackers) consume the envelope read-only and map it into
//! their own shapes.
//!
//! # Usage
//!
//! Capture the chain through the [`Throwable`] contract (or the
//! [`CapturedException`] builder) and hand it to a [`Translator`]:
//!
//! ```rust
//! use error_events::{CapturedException, StackFrame, Translator};
//!
//! let inner = CapturedException::new("db::ConstraintViolation")
//!     .with_message("column must not be null")
//!     .with_frame(StackFrame::new("db", "insert", "db.rs", 120));
//! let outer = CapturedException::new("api::BadRequest")
//!     .with_message("invalid input data")
//!     .with_frame(StackFrame::new("api", "create", "api.rs", 33))
//!     .with_cause(inner);
//!
//! let envelope = Translator::new().translate(&outer, None)?;
//! assert_eq!(Some("invalid input data"), envelope.summary());
//! let record = envelope.error_data().expect("error event");
//! assert_eq!(2, record.exceptions.len());
//! # Ok::<(), error_events::Error>(())
//! ```
//!
//! # Hashes
//!
//! Every record carries three 32-character lowercase hex fingerprints, built
//! so a downstream store can deduplicate without reparsing stack traces:
//!
//! | Hash               | Input                                            | Identifies                |
//! | ------------------ | ------------------------------------------------ | ------------------------- |
//! | `instance_hash`    | head type + top frame + message + arguments      | one exact occurrence      |
//! | `issue_hash`       | head type + top frame                            | the class of problem      |
//! | `stack_trace_hash` | retained frames of the head trace                | one (truncated) trace     |
//!
//! The issue hash input is a strict subset of the instance hash input: two
//! occurrences of the same bug with different data share an issue but not an
//! instance.
//!
//! Stack traces longer than the configured limit (50 frames by default) keep
//! the frames closest to the throw site and record how many were dropped; all
//! digests cover retained frames only, so truncated renderings of the same
//! trace still correlate.
//!
//! A [`Translator`] holds no per-call state and is safe to share across
//! threads.

#![deny(missing_docs, unreachable_pub, missing_debug_implementations)]
#![cfg_attr(test, deny(warnings))]

mod attrs;
mod convert;
mod error;
mod models;
mod throwable;
mod translate;

pub use attrs::{attrs_to_map, encode_attributes, Arguments};
pub use error::Error;
pub use models::{
    AnyValue, Envelope, ErrorData, ExceptionData, KeyValue, StackFrame, StackTrace, Value,
    ATTR_ERROR_MESSAGE, ATTR_ERROR_OBJECT, ERROR_DATA_TYPE_URL, EVENT_ERROR,
};
pub use throwable::{CapturedException, Throwable};

/// Stack trace frame limit used by [`Translator::new`].
pub const DEFAULT_MAX_FRAMES: usize = 50;

/// Translates exception chains into error event envelopes.
///
/// Configuration is fixed at construction; instances can be shared and reused
/// across calls and threads.
#[derive(Debug, Clone)]
pub struct Translator {
    max_frames: usize,
}

impl Translator {
    /// Create a translator with the default frame limit per stack trace.
    pub fn new() -> Self {
        Self {
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }

    /// Create a translator with a custom frame limit per stack trace.
    ///
    /// Returns [`Error::InvalidMaxFrames`] when `max_frames` is zero.
    pub fn with_max_frames(max_frames: usize) -> Result<Self, Error> {
        if max_frames == 0 {
            return Err(Error::InvalidMaxFrames);
        }
        Ok(Self { max_frames })
    }

    /// The configured frame limit per stack trace.
    pub fn max_frames(&self) -> usize {
        self.max_frames
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}
