use thiserror::Error;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A global tracing subscriber is already installed.
    #[error(transparent)]
    SetGlobalDefault(#[from] tracing::dispatcher::SetGlobalDefaultError),
}
