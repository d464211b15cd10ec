/// Errors that can occur while translating an exception chain.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The configured stack trace limit was zero. At least one frame per trace
    /// must be retained for the hashes to be meaningful.
    #[error("max frames per stack trace must be at least 1")]
    InvalidMaxFrames,

    /// The canonical error record failed to serialize for embedding into the
    /// envelope. No envelope is produced in this case.
    ///
    /// Note: This is an error in this crate. If you spot this, please open an
    /// issue.
    #[error("serializing error record failed with {0}")]
    SerializeErrorData(serde_json::Error),
}
