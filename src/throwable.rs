use crate::models::StackFrame;

/// A throwable-like value: the input contract of the translator.
///
/// Implementations expose the exception's own data plus its position in a
/// cause chain. Chains are walked newest first, so the originally thrown
/// exception is the value handed to the translator.
pub trait Throwable {
    /// Fully-qualified type name of the exception.
    fn type_name(&self) -> &str;

    /// Human-readable message, if any.
    fn message(&self) -> Option<&str>;

    /// Native stack frames in capture order, throw site first.
    fn frames(&self) -> &[StackFrame];

    /// The failure that caused this one.
    fn cause(&self) -> Option<&dyn Throwable> {
        None
    }

    /// For wrapping adapters whose sole purpose is to carry another failure:
    /// the wrapped failure. Takes precedence over [`cause`](Self::cause)
    /// during the chain walk, so the adapter's generic cause slot never
    /// contributes a synthetic node.
    fn wrapped_cause(&self) -> Option<&dyn Throwable> {
        None
    }
}

/// An owned exception snapshot, built field by field.
///
/// The usual way to feed the translator when bridging from a runtime's own
/// error values.
#[derive(Debug, Clone)]
pub struct CapturedException {
    type_name: String,
    message: Option<String>,
    frames: Vec<StackFrame>,
    cause: Option<Box<CapturedException>>,
    wrapped: Option<Box<CapturedException>>,
}

impl CapturedException {
    /// Create a snapshot for the given exception type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: None,
            frames: Vec::new(),
            cause: None,
            wrapped: None,
        }
    }

    /// Set the exception message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Replace the captured stack frames.
    pub fn with_frames(mut self, frames: Vec<StackFrame>) -> Self {
        self.frames = frames;
        self
    }

    /// Append one captured stack frame.
    pub fn with_frame(mut self, frame: StackFrame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Set the causing exception.
    pub fn with_cause(mut self, cause: CapturedException) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Mark this snapshot as a wrapping adapter around the given failure.
    pub fn with_wrapped(mut self, wrapped: CapturedException) -> Self {
        self.wrapped = Some(Box::new(wrapped));
        self
    }
}

impl Throwable for CapturedException {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    fn cause(&self) -> Option<&dyn Throwable> {
        self.cause.as_deref().map(|cause| cause as &dyn Throwable)
    }

    fn wrapped_cause(&self) -> Option<&dyn Throwable> {
        self.wrapped
            .as_deref()
            .map(|wrapped| wrapped as &dyn Throwable)
    }
}
