//! Transport contract between the stream sink and the remote log service.

use std::error::Error;
use std::fmt::{self, Debug};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Marker trait for stream transport errors.
pub trait StreamError: Debug + Error + Send + Sync + 'static {}

/// A single log event submitted to the remote stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEvent {
    /// When the event happened.
    pub timestamp: DateTime<Utc>,

    /// The formatted log line.
    pub message: String,
}

impl LogEvent {
    /// Creates a new event with the given timestamp and message.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }

    /// Creates a new event stamped with the current time.
    #[must_use]
    pub fn now(message: impl Into<String>) -> Self {
        Self::new(Utc::now(), message)
    }
}

/// Opaque continuation token handed back by the remote service after each
/// successful append. The next append against the same stream must carry it.
/// Compared only for equality; the contents mean nothing to this crate.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SequenceToken(String);

impl SequenceToken {
    /// Creates a new sequence token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token and returns the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SequenceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SequenceToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for SequenceToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// A stream as reported by the remote service's listing operation.
#[derive(Clone, Debug)]
pub struct StreamInfo {
    /// The stream's name.
    pub name: String,

    /// The token the next append must carry. Absent for empty streams.
    pub sequence_token: Option<SequenceToken>,
}

/// A trait representing the remote append-only log service, with
/// asynchronous operations for managing groups and streams and for
/// appending events.
#[async_trait]
pub trait StreamClient
where
    Self: Clone + Debug + Send + Sync + 'static,
{
    /// The error type for the transport.
    type Error: StreamError;

    /// Lists group names starting with the given prefix.
    async fn list_groups(&self, name_prefix: &str) -> Result<Vec<String>, Self::Error>;

    /// Creates a group.
    async fn create_group(&self, group_name: &str) -> Result<(), Self::Error>;

    /// Lists streams in a group whose names start with the given prefix.
    async fn list_streams(
        &self,
        group_name: &str,
        name_prefix: &str,
    ) -> Result<Vec<StreamInfo>, Self::Error>;

    /// Creates a stream within a group.
    async fn create_stream(&self, group_name: &str, stream_name: &str) -> Result<(), Self::Error>;

    /// Appends events to a stream, carrying the stream's current sequence
    /// token, and returns the token the next append must carry.
    async fn put_events(
        &self,
        group_name: &str,
        stream_name: &str,
        events: Vec<LogEvent>,
        sequence_token: Option<SequenceToken>,
    ) -> Result<Option<SequenceToken>, Self::Error>;
}
