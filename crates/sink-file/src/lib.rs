//! Implementation of log shipping using append-only files on disk, for local
//! development.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use std::error::Error as StdError;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use logship_sink::LogSink;
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Log sink appending timestamped lines to a file on disk.
///
/// Every call opens the file, appends one line and closes it again, so the
/// sink holds no file handle between calls. Write failures are reported via
/// `tracing` and swallowed; logging never fails the caller.
#[derive(Clone, Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Creates a new `FileSink` appending to the specified file.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyPath` if the path is empty.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(Error::EmptyPath);
        }

        Ok(Self { path })
    }

    async fn append(&self, level: &str, message: &str) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let line = format!("{level}: {timestamp}: {message}{LINE_ENDING}");

        if let Err(e) = self.write_line(&line).await {
            tracing::warn!("failed to append to log file: {e}");
        }
    }

    async fn write_line(&self, line: &str) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| Error::Io("error creating log directory", e))?;
            }
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| Error::Io("error opening log file", e))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| Error::Io("error writing log file", e))?;

        file.flush()
            .await
            .map_err(|e| Error::Io("error flushing log file", e))?;

        Ok(())
    }
}

#[async_trait]
impl LogSink for FileSink {
    async fn log_info(&self, message: &str) {
        self.append("INFO", message).await;
    }

    async fn log_error(&self, message: &str, error: Option<&(dyn StdError + Send + Sync)>) {
        match error {
            Some(error) => self.append("ERROR", &format!("{message} {error}")).await,
            None => self.append("ERROR", message).await,
        }
    }
}
