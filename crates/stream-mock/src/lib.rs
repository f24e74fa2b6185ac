//! A mock implementation of the stream transport. Used for testing.
//!
//! The mock keeps groups, streams and appended events in memory and enforces
//! the same sequence-token contract as the real service: every append must
//! carry the stream's current token and hands back a freshly minted one.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use logship_sink_stream::{LogEvent, SequenceToken, StreamClient, StreamInfo};
use tokio::sync::Mutex;

mod error;
pub use error::Error;

#[derive(Debug, Default)]
struct StreamState {
    sequence_token: Option<SequenceToken>,
    events: Vec<LogEvent>,
}

#[derive(Debug, Default)]
struct Inner {
    groups: HashMap<String, HashMap<String, StreamState>>,
    next_token: u64,
    fail_lists: usize,
    fail_puts: usize,
    create_group_calls: usize,
    create_stream_calls: usize,
    put_calls: usize,
    received_sequence_tokens: Vec<Option<SequenceToken>>,
}

/// A mock implementation of the `StreamClient` trait. Used for testing.
#[derive(Clone, Debug, Default)]
pub struct MockStreamClient {
    inner: Arc<Mutex<Inner>>,
}

impl MockStreamClient {
    /// Creates a new instance of `MockStreamClient`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a group without counting as a `create_group` call.
    pub async fn insert_group(&mut self, group_name: &str) {
        self.inner
            .lock()
            .await
            .groups
            .entry(group_name.to_string())
            .or_default();
    }

    /// Seeds a stream (and its group, if missing) with the given sequence
    /// token, without counting as create calls.
    pub async fn insert_stream(
        &mut self,
        group_name: &str,
        stream_name: &str,
        sequence_token: Option<SequenceToken>,
    ) {
        self.inner
            .lock()
            .await
            .groups
            .entry(group_name.to_string())
            .or_default()
            .insert(
                stream_name.to_string(),
                StreamState {
                    sequence_token,
                    events: Vec::new(),
                },
            );
    }

    /// Makes the next `count` listing calls fail with `Error::Injected`.
    pub async fn fail_lists(&mut self, count: usize) {
        self.inner.lock().await.fail_lists = count;
    }

    /// Makes the next `count` `put_events` calls fail with `Error::Injected`.
    pub async fn fail_puts(&mut self, count: usize) {
        self.inner.lock().await.fail_puts = count;
    }

    /// Number of `create_group` calls made so far.
    pub async fn create_group_calls(&self) -> usize {
        self.inner.lock().await.create_group_calls
    }

    /// Number of `create_stream` calls made so far.
    pub async fn create_stream_calls(&self) -> usize {
        self.inner.lock().await.create_stream_calls
    }

    /// Number of `put_events` calls made so far, failed ones included.
    pub async fn put_calls(&self) -> usize {
        self.inner.lock().await.put_calls
    }

    /// The sequence tokens carried by every `put_events` call, in call order,
    /// failed calls included.
    pub async fn received_sequence_tokens(&self) -> Vec<Option<SequenceToken>> {
        self.inner.lock().await.received_sequence_tokens.clone()
    }

    /// Events recorded for a stream, in append order.
    pub async fn events(&self, group_name: &str, stream_name: &str) -> Vec<LogEvent> {
        self.inner
            .lock()
            .await
            .groups
            .get(group_name)
            .and_then(|streams| streams.get(stream_name))
            .map(|stream| stream.events.clone())
            .unwrap_or_default()
    }

    /// Messages recorded for a stream, in append order.
    pub async fn messages(&self, group_name: &str, stream_name: &str) -> Vec<String> {
        self.events(group_name, stream_name)
            .await
            .into_iter()
            .map(|event| event.message)
            .collect()
    }
}

#[async_trait]
impl StreamClient for MockStreamClient {
    type Error = Error;

    async fn list_groups(&self, name_prefix: &str) -> Result<Vec<String>, Self::Error> {
        let mut inner = self.inner.lock().await;

        if inner.fail_lists > 0 {
            inner.fail_lists -= 1;
            return Err(Error::Injected);
        }

        let mut names: Vec<String> = inner
            .groups
            .keys()
            .filter(|name| name.starts_with(name_prefix))
            .cloned()
            .collect();
        names.sort();

        Ok(names)
    }

    async fn create_group(&self, group_name: &str) -> Result<(), Self::Error> {
        let mut inner = self.inner.lock().await;
        inner.create_group_calls += 1;

        if inner.groups.contains_key(group_name) {
            return Err(Error::GroupAlreadyExists(group_name.to_string()));
        }

        inner.groups.insert(group_name.to_string(), HashMap::new());

        Ok(())
    }

    async fn list_streams(
        &self,
        group_name: &str,
        name_prefix: &str,
    ) -> Result<Vec<StreamInfo>, Self::Error> {
        let mut inner = self.inner.lock().await;

        if inner.fail_lists > 0 {
            inner.fail_lists -= 1;
            return Err(Error::Injected);
        }

        let streams = inner
            .groups
            .get(group_name)
            .ok_or_else(|| Error::GroupNotFound(group_name.to_string()))?;

        let mut infos: Vec<StreamInfo> = streams
            .iter()
            .filter(|(name, _)| name.starts_with(name_prefix))
            .map(|(name, state)| StreamInfo {
                name: name.clone(),
                sequence_token: state.sequence_token.clone(),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(infos)
    }

    async fn create_stream(&self, group_name: &str, stream_name: &str) -> Result<(), Self::Error> {
        let mut inner = self.inner.lock().await;
        inner.create_stream_calls += 1;

        let streams = inner
            .groups
            .get_mut(group_name)
            .ok_or_else(|| Error::GroupNotFound(group_name.to_string()))?;

        if streams.contains_key(stream_name) {
            return Err(Error::StreamAlreadyExists(stream_name.to_string()));
        }

        streams.insert(stream_name.to_string(), StreamState::default());

        Ok(())
    }

    async fn put_events(
        &self,
        group_name: &str,
        stream_name: &str,
        events: Vec<LogEvent>,
        sequence_token: Option<SequenceToken>,
    ) -> Result<Option<SequenceToken>, Self::Error> {
        let mut inner = self.inner.lock().await;
        inner.put_calls += 1;
        inner.received_sequence_tokens.push(sequence_token.clone());

        if inner.fail_puts > 0 {
            inner.fail_puts -= 1;
            return Err(Error::Injected);
        }

        let next = inner.next_token + 1;

        let stream = inner
            .groups
            .get_mut(group_name)
            .ok_or_else(|| Error::GroupNotFound(group_name.to_string()))?
            .get_mut(stream_name)
            .ok_or_else(|| Error::StreamNotFound(stream_name.to_string()))?;

        if stream.sequence_token != sequence_token {
            return Err(Error::TokenMismatch {
                expected: stream.sequence_token.clone(),
                actual: sequence_token,
            });
        }

        let minted = SequenceToken::new(format!("mock-token-{next}"));
        stream.events.extend(events);
        stream.sequence_token = Some(minted.clone());
        inner.next_token = next;

        Ok(Some(minted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_requires_matching_token() {
        let mut client = MockStreamClient::new();
        client
            .insert_stream("group", "stream", Some("tok-1".into()))
            .await;

        let mismatch = client
            .put_events("group", "stream", vec![LogEvent::now("nope")], None)
            .await;
        assert!(matches!(mismatch, Err(Error::TokenMismatch { .. })));

        let minted = client
            .put_events(
                "group",
                "stream",
                vec![LogEvent::now("yes")],
                Some("tok-1".into()),
            )
            .await
            .unwrap();
        assert_eq!(minted, Some(SequenceToken::new("mock-token-1")));

        client
            .put_events("group", "stream", vec![LogEvent::now("again")], minted)
            .await
            .unwrap();

        assert_eq!(
            client.messages("group", "stream").await,
            vec!["yes".to_string(), "again".to_string()]
        );
    }

    #[tokio::test]
    async fn test_put_rejects_unknown_names() {
        let mut client = MockStreamClient::new();

        let no_group = client
            .put_events("missing", "stream", vec![LogEvent::now("x")], None)
            .await;
        assert!(matches!(no_group, Err(Error::GroupNotFound(_))));

        client.insert_group("group").await;

        let no_stream = client
            .put_events("group", "missing", vec![LogEvent::now("x")], None)
            .await;
        assert!(matches!(no_stream, Err(Error::StreamNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates() {
        let client = MockStreamClient::new();

        client.create_group("group").await.unwrap();
        let dup_group = client.create_group("group").await;
        assert!(matches!(dup_group, Err(Error::GroupAlreadyExists(_))));

        client.create_stream("group", "stream").await.unwrap();
        let dup_stream = client.create_stream("group", "stream").await;
        assert!(matches!(dup_stream, Err(Error::StreamAlreadyExists(_))));

        assert_eq!(client.create_group_calls().await, 2);
        assert_eq!(client.create_stream_calls().await, 2);
    }

    #[tokio::test]
    async fn test_listing_filters_by_prefix() {
        let mut client = MockStreamClient::new();
        client.insert_group("app-logs").await;
        client.insert_group("audit-logs").await;
        client.insert_stream("app-logs", "web-1", None).await;
        client.insert_stream("app-logs", "worker-1", None).await;

        assert_eq!(
            client.list_groups("app").await.unwrap(),
            vec!["app-logs".to_string()]
        );

        let streams = client.list_streams("app-logs", "web").await.unwrap();
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].name, "web-1");
    }

    #[tokio::test]
    async fn test_injected_failures_are_consumed() {
        let mut client = MockStreamClient::new();
        client.insert_stream("group", "stream", None).await;
        client.fail_puts(1).await;

        let injected = client
            .put_events("group", "stream", vec![LogEvent::now("lost")], None)
            .await;
        assert!(matches!(injected, Err(Error::Injected)));

        client
            .put_events("group", "stream", vec![LogEvent::now("kept")], None)
            .await
            .unwrap();

        assert_eq!(client.put_calls().await, 2);
        assert_eq!(
            client.messages("group", "stream").await,
            vec!["kept".to_string()]
        );
    }

    #[tokio::test]
    async fn test_received_tokens_are_recorded_in_order() {
        let mut client = MockStreamClient::new();
        client.insert_stream("group", "stream", None).await;

        let first = client
            .put_events("group", "stream", vec![LogEvent::now("a")], None)
            .await
            .unwrap();
        client
            .put_events("group", "stream", vec![LogEvent::now("b")], first.clone())
            .await
            .unwrap();

        assert_eq!(client.received_sequence_tokens().await, vec![None, first]);
    }
}
