//! Per-category logger registry and the queue worker behind it.

use std::sync::Arc;

use dashmap::DashMap;
use logship_sink::LogSink;
use tokio::sync::mpsc;
use tracing::Level;

/// Default capacity of the line queue between loggers and the worker.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Registry of per-category loggers, all feeding one bounded queue drained
/// by a background worker that owns the sink.
///
/// Lines are shipped strictly in the order they were queued, and only the
/// worker ever touches the sink, so a remote sink sees no concurrent
/// appends through this path.
pub struct LoggerProvider {
    loggers: DashMap<String, Arc<CategoryLogger>>,
    sender: mpsc::Sender<String>,
}

impl LoggerProvider {
    /// Creates a provider draining into the given sink, with the default
    /// queue capacity.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self::with_capacity(sink, DEFAULT_QUEUE_CAPACITY)
    }

    /// Creates a provider with a specific queue capacity. Once the queue is
    /// full, further lines are dropped until the worker catches up.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or if called outside a Tokio runtime.
    #[must_use]
    pub fn with_capacity(sink: Arc<dyn LogSink>, capacity: usize) -> Self {
        let (sender, mut receiver) = mpsc::channel::<String>(capacity);

        // Exits once the provider and every logger handle are gone, after
        // draining whatever is still queued.
        tokio::spawn(async move {
            while let Some(line) = receiver.recv().await {
                sink.log_info(&line).await;
            }
        });

        Self {
            loggers: DashMap::new(),
            sender,
        }
    }

    /// Returns the logger for a category, creating it on first use.
    /// Repeated calls with the same category return the same instance.
    pub fn logger(&self, category: &str) -> Arc<CategoryLogger> {
        self.loggers
            .entry(category.to_string())
            .or_insert_with(|| {
                Arc::new(CategoryLogger {
                    category: category.to_string(),
                    sender: self.sender.clone(),
                })
            })
            .clone()
    }

    /// Drops all cached loggers. Nothing is flushed or cancelled: queued
    /// lines still reach the sink, and previously handed-out loggers keep
    /// working.
    pub fn clear(&self) {
        self.loggers.clear();
    }
}

/// Logger handle for one category.
pub struct CategoryLogger {
    category: String,
    sender: mpsc::Sender<String>,
}

impl CategoryLogger {
    /// The category this logger tags its lines with.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Formats and queues one line, returning immediately. The line is
    /// dropped silently when the queue is full or the worker is gone;
    /// logging never blocks the caller.
    pub fn log(&self, level: Level, message: &str) {
        let line = format!("[{level}] {}: {message}", self.category);

        let _ = self.sender.try_send(line);
    }
}
