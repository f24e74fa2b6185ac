//! Implementation of the stream transport using AWS CloudWatch Logs.
//! Credentials and signing are handled entirely by the AWS SDK.
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_cloudwatchlogs::Client;
use aws_sdk_cloudwatchlogs::types::InputLogEvent;
use logship_sink_stream::{LogEvent, SequenceToken, StreamClient, StreamInfo};

/// Options for configuring a `CloudWatchStreamClient`.
pub struct CloudWatchStreamClientOptions {
    /// The AWS region to use.
    pub region: String,
}

/// Stream transport backed by AWS CloudWatch Logs.
#[derive(Clone, Debug)]
pub struct CloudWatchStreamClient {
    client: Client,
}

impl CloudWatchStreamClient {
    /// Creates a new `CloudWatchStreamClient` with the specified options.
    pub async fn new(
        CloudWatchStreamClientOptions { region }: CloudWatchStreamClientOptions,
    ) -> Self {
        let config = aws_config::from_env()
            .region(Region::new(region))
            .load()
            .await;

        Self {
            client: Client::new(&config),
        }
    }

    /// Creates a new `CloudWatchStreamClient` from an existing SDK client.
    #[must_use]
    pub const fn new_with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StreamClient for CloudWatchStreamClient {
    type Error = Error;

    async fn list_groups(&self, name_prefix: &str) -> Result<Vec<String>, Self::Error> {
        let resp = self
            .client
            .describe_log_groups()
            .log_group_name_prefix(name_prefix)
            .send()
            .await
            .map_err(|e| Error::CloudWatch(e.into()))?;

        Ok(resp
            .log_groups()
            .iter()
            .filter_map(|group| group.log_group_name().map(ToString::to_string))
            .collect())
    }

    async fn create_group(&self, group_name: &str) -> Result<(), Self::Error> {
        self.client
            .create_log_group()
            .log_group_name(group_name)
            .send()
            .await
            .map_err(|e| Error::CloudWatch(e.into()))?;

        Ok(())
    }

    async fn list_streams(
        &self,
        group_name: &str,
        name_prefix: &str,
    ) -> Result<Vec<StreamInfo>, Self::Error> {
        let resp = self
            .client
            .describe_log_streams()
            .log_group_name(group_name)
            .log_stream_name_prefix(name_prefix)
            .send()
            .await
            .map_err(|e| Error::CloudWatch(e.into()))?;

        Ok(resp
            .log_streams()
            .iter()
            .filter_map(|stream| {
                stream.log_stream_name().map(|name| StreamInfo {
                    name: name.to_string(),
                    sequence_token: stream.upload_sequence_token().map(SequenceToken::from),
                })
            })
            .collect())
    }

    async fn create_stream(&self, group_name: &str, stream_name: &str) -> Result<(), Self::Error> {
        self.client
            .create_log_stream()
            .log_group_name(group_name)
            .log_stream_name(stream_name)
            .send()
            .await
            .map_err(|e| Error::CloudWatch(e.into()))?;

        Ok(())
    }

    async fn put_events(
        &self,
        group_name: &str,
        stream_name: &str,
        events: Vec<LogEvent>,
        sequence_token: Option<SequenceToken>,
    ) -> Result<Option<SequenceToken>, Self::Error> {
        let log_events = events
            .into_iter()
            .map(|event| {
                InputLogEvent::builder()
                    .timestamp(event.timestamp.timestamp_millis())
                    .message(event.message)
                    .build()
                    .map_err(|e| Error::BuildEvent(e.to_string()))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let resp = self
            .client
            .put_log_events()
            .log_group_name(group_name)
            .log_stream_name(stream_name)
            .set_log_events(Some(log_events))
            .set_sequence_token(sequence_token.map(SequenceToken::into_inner))
            .send()
            .await
            .map_err(|e| Error::CloudWatch(e.into()))?;

        Ok(resp.next_sequence_token().map(SequenceToken::from))
    }
}
