use serde::{Deserialize, Serialize};
use std::fmt;

/// The retained portion of one exception's native stack trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackTrace {
    /// Retained frames in native order, throw site first.
    pub frames: Vec<StackFrame>,

    /// Number of frames dropped by truncation. 0 if the whole trace fits.
    #[serde(default)]
    pub dropped_count: u64,
}

/// One stack location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    /// Module or load-unit name.
    pub module: String,

    /// Function name.
    pub function: String,

    /// Source file name. May be empty when unknown.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file: String,

    /// Line number.
    pub line: u32,

    /// Column number, when the runtime provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl StackFrame {
    /// Create a frame without column information.
    pub fn new(
        module: impl Into<String>,
        function: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            module: module.into(),
            function: function.into(),
            file: file.into(),
            line,
            column: None,
        }
    }

    /// Attach a column number.
    pub fn with_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }
}

impl fmt::Display for StackFrame {
    /// Canonical string form of a frame. Every digest input uses this
    /// rendering, so it must stay stable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.is_empty() {
            return write!(f, "{}::{}", self.module, self.function);
        }
        match self.column {
            Some(column) => write!(
                f,
                "{}::{}({}:{}:{})",
                self.module, self.function, self.file, self.line, column
            ),
            None => write!(
                f,
                "{}::{}({}:{})",
                self.module, self.function, self.file, self.line
            ),
        }
    }
}
