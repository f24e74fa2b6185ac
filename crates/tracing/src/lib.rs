//! Bridges the `tracing` ecosystem into a log sink: events become formatted
//! `[LEVEL] category: message` lines, queued per provider and shipped by a
//! background worker.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
mod layer;
mod provider;

pub use error::Error;
pub use layer::SinkLayer;
pub use provider::{CategoryLogger, DEFAULT_QUEUE_CAPACITY, LoggerProvider};

use std::sync::Arc;

use logship_sink::LogSink;
use tracing_subscriber::layer::SubscriberExt;

/// Installs a global `tracing` subscriber that ships every event to the
/// given sink, and returns the provider backing it.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn init(sink: Arc<dyn LogSink>) -> Result<Arc<LoggerProvider>, Error> {
    let provider = Arc::new(LoggerProvider::new(sink));

    let subscriber = tracing_subscriber::registry().with(SinkLayer::new(provider.clone()));
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(provider)
}
