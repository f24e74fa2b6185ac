//! Behaviour tests for the stream sink against the in-memory transport.

use std::error::Error as StdError;
use std::sync::Arc;

use logship_sink::LogSink;
use logship_sink::test_support::CaptureSink;
use logship_sink_stream::{Error, StreamSink, StreamSinkOptions};
use logship_stream_mock::MockStreamClient;

const GROUP: &str = "app-logs";
const STREAM: &str = "web-1";

fn new_sink(client: &MockStreamClient, diagnostics: &CaptureSink) -> StreamSink<MockStreamClient> {
    StreamSink::new(StreamSinkOptions {
        client: client.clone(),
        diagnostics: Arc::new(diagnostics.clone()),
        group_name: GROUP.to_string(),
        stream_name: STREAM.to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_empty_names_are_rejected() {
    let client = MockStreamClient::new();

    let no_group = StreamSink::new(StreamSinkOptions {
        client: client.clone(),
        diagnostics: Arc::new(CaptureSink::new()),
        group_name: String::new(),
        stream_name: STREAM.to_string(),
    });
    assert!(matches!(no_group, Err(Error::Configuration(_))));

    let no_stream = StreamSink::new(StreamSinkOptions {
        client,
        diagnostics: Arc::new(CaptureSink::new()),
        group_name: GROUP.to_string(),
        stream_name: String::new(),
    });
    assert!(matches!(no_stream, Err(Error::Configuration(_))));
}

#[tokio::test]
async fn test_initialize_creates_missing_group_and_stream() {
    let client = MockStreamClient::new();
    let diagnostics = CaptureSink::new();
    let sink = new_sink(&client, &diagnostics);

    sink.initialize().await.unwrap();

    assert_eq!(client.create_group_calls().await, 1);
    assert_eq!(client.create_stream_calls().await, 1);

    sink.log_info("hello").await;

    assert_eq!(client.received_sequence_tokens().await, vec![None]);
    assert_eq!(
        client.messages(GROUP, STREAM).await,
        vec!["INFO: hello".to_string()]
    );
    assert!(diagnostics.errors().is_empty());
}

#[tokio::test]
async fn test_initialize_adopts_existing_stream_token() {
    let mut client = MockStreamClient::new();
    client
        .insert_stream(GROUP, STREAM, Some("existing-7".into()))
        .await;

    let diagnostics = CaptureSink::new();
    let sink = new_sink(&client, &diagnostics);

    sink.initialize().await.unwrap();

    assert_eq!(client.create_group_calls().await, 0);
    assert_eq!(client.create_stream_calls().await, 0);

    sink.log_info("resumed").await;

    assert_eq!(
        client.received_sequence_tokens().await,
        vec![Some("existing-7".into())]
    );
}

#[tokio::test]
async fn test_successful_appends_advance_the_token() {
    let client = MockStreamClient::new();
    let diagnostics = CaptureSink::new();
    let sink = new_sink(&client, &diagnostics);

    sink.initialize().await.unwrap();
    sink.log_info("first").await;
    sink.log_info("second").await;

    assert_eq!(
        client.received_sequence_tokens().await,
        vec![None, Some("mock-token-1".into())]
    );
}

#[tokio::test]
async fn test_failed_append_keeps_token_and_reports() {
    let mut client = MockStreamClient::new();
    let diagnostics = CaptureSink::new();
    let sink = new_sink(&client, &diagnostics);

    sink.initialize().await.unwrap();
    sink.log_info("first").await;

    client.fail_puts(1).await;
    sink.log_info("lost").await;
    sink.log_info("after").await;

    // The failed call and the retry both carry the token from "first".
    assert_eq!(
        client.received_sequence_tokens().await,
        vec![
            None,
            Some("mock-token-1".into()),
            Some("mock-token-1".into()),
        ]
    );
    assert_eq!(
        client.messages(GROUP, STREAM).await,
        vec!["INFO: first".to_string(), "INFO: after".to_string()]
    );
    assert!(diagnostics.contains("failed to ship log event: INFO: lost"));
}

#[tokio::test]
async fn test_error_lines_carry_optional_error_text() {
    let client = MockStreamClient::new();
    let diagnostics = CaptureSink::new();
    let sink = new_sink(&client, &diagnostics);

    sink.initialize().await.unwrap();

    let err = std::io::Error::other("connection reset");
    sink.log_error("upload failed", Some(&err as &(dyn StdError + Send + Sync)))
        .await;
    sink.log_error("no cause", None).await;

    assert_eq!(
        client.messages(GROUP, STREAM).await,
        vec![
            "ERROR: upload failed connection reset".to_string(),
            "ERROR: no cause".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_initialize_failure_is_reported_and_returned() {
    let mut client = MockStreamClient::new();
    client.fail_lists(1).await;

    let diagnostics = CaptureSink::new();
    let sink = new_sink(&client, &diagnostics);

    let result = sink.initialize().await;

    assert!(matches!(result, Err(Error::Client(_, _))));
    assert!(diagnostics.contains("failed to initialize log stream"));
}

#[tokio::test]
async fn test_append_before_initialize_is_swallowed() {
    let client = MockStreamClient::new();
    let diagnostics = CaptureSink::new();
    let sink = new_sink(&client, &diagnostics);

    sink.log_info("early").await;

    assert_eq!(client.put_calls().await, 1);
    assert!(client.messages(GROUP, STREAM).await.is_empty());
    assert!(diagnostics.contains("failed to ship log event: INFO: early"));
}

#[tokio::test]
async fn test_concurrent_appends_all_land() {
    let client = MockStreamClient::new();
    let diagnostics = CaptureSink::new();
    let sink = Arc::new(new_sink(&client, &diagnostics));

    sink.initialize().await.unwrap();

    let mut handles = Vec::new();
    for i in 0..10 {
        let sink = sink.clone();
        handles.push(tokio::spawn(async move {
            sink.log_info(&format!("line {i}")).await;
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    // The mock rejects any append carrying a stale token, so ten recorded
    // messages means the appends serialised correctly.
    assert_eq!(client.messages(GROUP, STREAM).await.len(), 10);
    assert!(diagnostics.errors().is_empty());
}
