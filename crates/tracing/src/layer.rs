//! Bridge from `tracing` events to the logger registry.

use std::sync::Arc;

use tracing::{Event, Subscriber, field::Visit};
use tracing_subscriber::{Layer, layer::Context, registry::LookupSpan};

use crate::provider::LoggerProvider;

// Targets skipped by default: this workspace's own crates plus the AWS and
// HTTP stack underneath them. An event emitted while shipping a line must
// not feed back into the layer.
const DEFAULT_SKIP_PREFIXES: &[&str] = &["logship_", "aws_", "hyper", "h2", "rustls", "tower"];

/// A tracing layer that forwards events to a `LoggerProvider`.
///
/// Each event becomes one line, dispatched through the logger for the
/// event's target. Spans are ignored; all levels are forwarded, so level
/// filtering belongs to the surrounding subscriber stack.
pub struct SinkLayer {
    provider: Arc<LoggerProvider>,
    skip_prefixes: Vec<String>,
}

impl SinkLayer {
    /// Creates a new layer dispatching through the given provider.
    #[must_use]
    pub fn new(provider: Arc<LoggerProvider>) -> Self {
        Self {
            provider,
            skip_prefixes: DEFAULT_SKIP_PREFIXES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Also skips events whose target starts with the given prefix.
    #[must_use]
    pub fn skip_target(mut self, prefix: impl Into<String>) -> Self {
        self.skip_prefixes.push(prefix.into());
        self
    }

    fn is_skipped(&self, target: &str) -> bool {
        self.skip_prefixes
            .iter()
            .any(|prefix| target.starts_with(prefix))
    }
}

impl<S> Layer<S> for SinkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let target = event.metadata().target();
        if self.is_skipped(target) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.provider
            .logger(target)
            .log(*event.metadata().level(), &visitor.message);
    }
}

/// Visitor to extract the message from tracing fields
#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            // Append other fields as key=value
            if !self.message.is_empty() {
                self.message.push(' ');
            }
            use std::fmt::Write;
            let _ = write!(&mut self.message, "{}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            if !self.message.is_empty() {
                self.message.push(' ');
            }
            use std::fmt::Write;
            let _ = write!(&mut self.message, "{}={:?}", field.name(), value);
        }
    }
}
