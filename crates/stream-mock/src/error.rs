use logship_sink_stream::{SequenceToken, StreamError};
use thiserror::Error;

/// Error type for the mock stream transport.
#[derive(Debug, Error)]
pub enum Error {
    /// The group already exists.
    #[error("group already exists: {0}")]
    GroupAlreadyExists(String),

    /// The group does not exist.
    #[error("group not found: {0}")]
    GroupNotFound(String),

    /// An injected failure, requested by a test.
    #[error("injected failure")]
    Injected,

    /// The stream already exists.
    #[error("stream already exists: {0}")]
    StreamAlreadyExists(String),

    /// The stream does not exist.
    #[error("stream not found: {0}")]
    StreamNotFound(String),

    /// The supplied sequence token does not match the stream's current one.
    #[error("sequence token mismatch: expected {expected:?}, got {actual:?}")]
    TokenMismatch {
        /// The token the stream currently requires.
        expected: Option<SequenceToken>,

        /// The token the caller supplied.
        actual: Option<SequenceToken>,
    },
}

impl StreamError for Error {}
