//! Abstract interface for shipping log lines to a destination.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::error::Error;

use async_trait::async_trait;

#[cfg(feature = "test-support")]
pub mod test_support;

/// A destination for log lines.
///
/// Sinks are infallible from the caller's point of view: implementations
/// handle their own failures (typically by reporting them through a separate
/// diagnostic channel) rather than handing them back up the logging path.
///
/// # Required Methods
/// - `async fn log_info(&self, message: &str)`: Records an informational message.
/// - `async fn log_error(&self, message: &str, error: Option<..>)`: Records an
///   error message, with the causing error's text appended when one is given.
#[async_trait]
pub trait LogSink: Send + Sync + 'static {
    /// Records an informational message.
    async fn log_info(&self, message: &str);

    /// Records an error message, optionally with the error that caused it.
    async fn log_error(&self, message: &str, error: Option<&(dyn Error + Send + Sync)>);
}
