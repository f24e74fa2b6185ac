//! Test support utilities
//!
//! This module provides an in-memory sink for capturing log lines during
//! tests. It's only available when the `test-support` feature is enabled.

use std::error::Error;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::LogSink;

/// A sink that captures all lines in memory for testing
#[derive(Clone, Default)]
pub struct CaptureSink {
    infos: Arc<Mutex<Vec<String>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl CaptureSink {
    /// Create a new capture sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all captured info lines
    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    /// Get all captured error lines
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    /// Check if any captured line contains a specific string
    pub fn contains(&self, text: &str) -> bool {
        self.infos.lock().unwrap().iter().any(|l| l.contains(text))
            || self.errors.lock().unwrap().iter().any(|l| l.contains(text))
    }

    /// Clear captured lines
    pub fn clear(&self) {
        self.infos.lock().unwrap().clear();
        self.errors.lock().unwrap().clear();
    }
}

#[async_trait]
impl LogSink for CaptureSink {
    async fn log_info(&self, message: &str) {
        if let Ok(mut infos) = self.infos.lock() {
            infos.push(message.to_string());
        }
    }

    async fn log_error(&self, message: &str, error: Option<&(dyn Error + Send + Sync)>) {
        let line = match error {
            Some(error) => format!("{message} {error}"),
            None => message.to_string(),
        };

        if let Ok(mut errors) = self.errors.lock() {
            errors.push(line);
        }
    }
}
