//! The remote stream sink.

use std::error::Error as StdError;
use std::fmt::{self, Debug};
use std::sync::Arc;

use async_trait::async_trait;
use logship_sink::LogSink;
use tokio::sync::Mutex;

use crate::client::{LogEvent, SequenceToken, StreamClient};
use crate::error::Error;

/// Options for configuring a `StreamSink`.
pub struct StreamSinkOptions<C>
where
    C: StreamClient,
{
    /// Transport client for the remote log service.
    pub client: C,

    /// Sink the stream sink reports its own failures through. Must not be
    /// the stream sink itself; a file sink is the usual choice.
    pub diagnostics: Arc<dyn LogSink>,

    /// Name of the group the stream lives in.
    pub group_name: String,

    /// Name of the stream to append to.
    pub stream_name: String,
}

/// Log sink appending lines to a remote append-only stream.
///
/// The sink owns the stream's sequence token: each successful append replaces
/// it with the token the service returned, and the token is read and replaced
/// under one lock so concurrent appends serialise instead of racing. Append
/// failures are reported through the diagnostic sink and swallowed; the
/// failed line is lost.
pub struct StreamSink<C>
where
    C: StreamClient,
{
    client: C,
    diagnostics: Arc<dyn LogSink>,
    group_name: String,
    stream_name: String,
    sequence_token: Mutex<Option<SequenceToken>>,
}

impl<C> StreamSink<C>
where
    C: StreamClient,
{
    /// Creates a new `StreamSink`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the group or stream name is empty.
    pub fn new(
        StreamSinkOptions {
            client,
            diagnostics,
            group_name,
            stream_name,
        }: StreamSinkOptions<C>,
    ) -> Result<Self, Error> {
        if group_name.is_empty() {
            return Err(Error::Configuration(
                "group name must not be empty".to_string(),
            ));
        }

        if stream_name.is_empty() {
            return Err(Error::Configuration(
                "stream name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            client,
            diagnostics,
            group_name,
            stream_name,
            sequence_token: Mutex::new(None),
        })
    }

    /// Ensures the remote group and stream exist and adopts the stream's
    /// current sequence token. Must be called once before logging; appends
    /// made earlier simply fail against the remote service and are swallowed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Client` if any transport call fails. The failure is
    /// also reported through the diagnostic sink.
    pub async fn initialize(&self) -> Result<(), Error> {
        if let Err(e) = self.try_initialize().await {
            self.diagnostics
                .log_error("failed to initialize log stream", Some(&e))
                .await;
            return Err(e);
        }

        Ok(())
    }

    async fn try_initialize(&self) -> Result<(), Error> {
        let groups = self
            .client
            .list_groups(&self.group_name)
            .await
            .map_err(|e| Error::Client("error listing log groups", Box::new(e)))?;

        if !groups.iter().any(|name| *name == self.group_name) {
            self.client
                .create_group(&self.group_name)
                .await
                .map_err(|e| Error::Client("error creating log group", Box::new(e)))?;
        }

        let streams = self
            .client
            .list_streams(&self.group_name, &self.stream_name)
            .await
            .map_err(|e| Error::Client("error listing log streams", Box::new(e)))?;

        let existing = streams.into_iter().find(|s| s.name == self.stream_name);

        match existing {
            Some(stream) => {
                *self.sequence_token.lock().await = stream.sequence_token;
            }
            None => {
                self.client
                    .create_stream(&self.group_name, &self.stream_name)
                    .await
                    .map_err(|e| Error::Client("error creating log stream", Box::new(e)))?;

                *self.sequence_token.lock().await = None;
            }
        }

        Ok(())
    }

    async fn send(&self, message: String) {
        let event = LogEvent::now(message);

        let mut token = self.sequence_token.lock().await;
        let result = self
            .client
            .put_events(
                &self.group_name,
                &self.stream_name,
                vec![event.clone()],
                token.clone(),
            )
            .await;

        match result {
            Ok(next_token) => {
                *token = next_token;
            }
            Err(e) => {
                // Token stays as-is so the next append retries with it.
                drop(token);

                self.diagnostics
                    .log_error(
                        &format!("failed to ship log event: {}", event.message),
                        Some(&e),
                    )
                    .await;
            }
        }
    }
}

impl<C> Debug for StreamSink<C>
where
    C: StreamClient,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSink")
            .field("client", &self.client)
            .field("group_name", &self.group_name)
            .field("stream_name", &self.stream_name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C> LogSink for StreamSink<C>
where
    C: StreamClient,
{
    async fn log_info(&self, message: &str) {
        self.send(format!("INFO: {message}")).await;
    }

    async fn log_error(&self, message: &str, error: Option<&(dyn StdError + Send + Sync)>) {
        match error {
            Some(error) => self.send(format!("ERROR: {message} {error}")).await,
            None => self.send(format!("ERROR: {message}")).await,
        }
    }
}
