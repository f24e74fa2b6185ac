use thiserror::Error;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport operation failed.
    #[error("{0}: {1}")]
    Client(
        &'static str,
        #[source] Box<dyn std::error::Error + Send + Sync>,
    ),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}
