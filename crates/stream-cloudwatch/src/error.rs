use logship_sink_stream::StreamError;
use thiserror::Error;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to build a log event for submission.
    #[error("error building log event: {0}")]
    BuildEvent(String),

    /// CloudWatch Logs operation failed.
    #[error(transparent)]
    CloudWatch(#[from] aws_sdk_cloudwatchlogs::Error),
}

impl StreamError for Error {}
