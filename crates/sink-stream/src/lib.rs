//! Log sink shipping lines to a remote append-only log stream, tracking the
//! stream's sequence token across appends.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod client;
mod error;
mod sink;

pub use client::{LogEvent, SequenceToken, StreamClient, StreamError, StreamInfo};
pub use error::Error;
pub use sink::{StreamSink, StreamSinkOptions};
