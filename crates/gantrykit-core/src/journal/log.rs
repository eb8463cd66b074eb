//! Jog journal implementation.
//!
//! Provides the append-only `JogLog` shared by the links, the jog sessions,
//! and the UI layer.

use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use super::entry::{LogEntry, LogLevel};

/// Configuration for the jog journal
#[derive(Debug, Clone)]
pub struct JogLogConfig {
    /// Channel capacity for live subscribers.
    pub channel_capacity: usize,
    /// Maximum number of entries kept for `entries()`. `None` keeps all.
    pub history_limit: Option<usize>,
}

impl Default for JogLogConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            history_limit: None,
        }
    }
}

struct JournalInner {
    sender: broadcast::Sender<LogEntry>,
    history: RwLock<VecDeque<LogEntry>>,
    next_sequence: RwLock<u64>,
    config: JogLogConfig,
}

/// Append-only, ordered log of jog activity
///
/// Cheap to clone; all clones append to the same journal. Appends from any
/// thread are totally ordered by their sequence number.
#[derive(Clone)]
pub struct JogLog {
    inner: Arc<JournalInner>,
}

impl JogLog {
    /// Create a new journal with default configuration
    pub fn new() -> Self {
        Self::with_config(JogLogConfig::default())
    }

    /// Create a new journal with custom configuration
    pub fn with_config(config: JogLogConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            inner: Arc::new(JournalInner {
                sender,
                history: RwLock::new(VecDeque::new()),
                next_sequence: RwLock::new(0),
                config,
            }),
        }
    }

    /// Append an entry and deliver it to live subscribers
    pub fn append(&self, level: LogLevel, message: impl Into<String>) -> LogEntry {
        // Sequence assignment, history push and broadcast happen under one
        // lock so subscribers see entries in sequence order.
        let mut sequence = self.inner.next_sequence.write();
        let entry = LogEntry::new(*sequence, level, message.into());
        *sequence += 1;

        {
            let mut history = self.inner.history.write();
            history.push_back(entry.clone());
            if let Some(limit) = self.inner.config.history_limit {
                while history.len() > limit {
                    history.pop_front();
                }
            }
        }

        // No receivers is not an error for an append-only log
        let _ = self.inner.sender.send(entry.clone());
        entry
    }

    /// Append an informational entry
    pub fn info(&self, message: impl Into<String>) -> LogEntry {
        self.append(LogLevel::Info, message)
    }

    /// Append a warning entry
    pub fn warn(&self, message: impl Into<String>) -> LogEntry {
        self.append(LogLevel::Warning, message)
    }

    /// Append an error entry
    pub fn error(&self, message: impl Into<String>) -> LogEntry {
        self.append(LogLevel::Error, message)
    }

    /// Start watching the journal.
    ///
    /// The subscription yields only entries appended after this call.
    pub fn subscribe(&self) -> LogSubscription {
        LogSubscription {
            receiver: self.inner.sender.subscribe(),
        }
    }

    /// Snapshot of the retained history, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.inner.history.read().iter().cloned().collect()
    }

    /// Retained entries with a sequence number at or after `sequence`
    pub fn entries_since(&self, sequence: u64) -> Vec<LogEntry> {
        self.inner
            .history
            .read()
            .iter()
            .filter(|entry| entry.sequence >= sequence)
            .cloned()
            .collect()
    }

    /// Messages of the retained history, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.inner
            .history
            .read()
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    /// Total number of entries ever appended
    pub fn len(&self) -> u64 {
        *self.inner.next_sequence.read()
    }

    /// Whether nothing has been appended yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the configuration
    pub fn config(&self) -> &JogLogConfig {
        &self.inner.config
    }
}

impl Default for JogLog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for JogLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JogLog")
            .field("len", &self.len())
            .field("subscribers", &self.inner.sender.receiver_count())
            .finish()
    }
}

/// Live view of a `JogLog`
///
/// An endless sequence of entries for as long as the journal exists. It cannot
/// be rewound; take a new subscription (or `JogLog::entries`) for history.
pub struct LogSubscription {
    receiver: broadcast::Receiver<LogEntry>,
}

impl LogSubscription {
    /// Wait for the next entry.
    ///
    /// Returns `None` only once every handle to the journal has been dropped.
    /// A subscriber that falls too far behind skips the overwritten entries.
    pub async fn next(&mut self) -> Option<LogEntry> {
        loop {
            match self.receiver.recv().await {
                Ok(entry) => return Some(entry),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Log subscriber lagged, {} entries skipped", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next entry if one is already waiting
    pub fn try_next(&mut self) -> Option<LogEntry> {
        loop {
            match self.receiver.try_recv() {
                Ok(entry) => return Some(entry),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Log subscriber lagged, {} entries skipped", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Drain everything currently waiting
    pub fn drain(&mut self) -> Vec<LogEntry> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}
