//! Lifecycle journal.
//!
//! In-memory record of plugin lifecycle signals. Every recorded event is
//! also emitted through `tracing`, so the journal is an inspectable copy of
//! what the log stream shows.

use crate::core::{now, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

/// Default number of events kept before the oldest is evicted.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 1000;

/// Kind of lifecycle event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEventKind {
    /// Module constructed with its wrapper
    Constructed,
    /// Start hook about to run
    Starting,
    /// Start hook completed
    Started,
    /// Stop hook about to run
    Stopping,
    /// Stop hook completed
    Stopped,
    /// Stop hook reported a cleanup error
    CleanupFailed,
    /// Extension binding declared
    ExtensionDeclared,
    /// Start hook failed
    Failed,
}

impl std::fmt::Display for LifecycleEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleEventKind::Constructed => write!(f, "constructed"),
            LifecycleEventKind::Starting => write!(f, "starting"),
            LifecycleEventKind::Started => write!(f, "started"),
            LifecycleEventKind::Stopping => write!(f, "stopping"),
            LifecycleEventKind::Stopped => write!(f, "stopped"),
            LifecycleEventKind::CleanupFailed => write!(f, "cleanup_failed"),
            LifecycleEventKind::ExtensionDeclared => write!(f, "extension_declared"),
            LifecycleEventKind::Failed => write!(f, "failed"),
        }
    }
}

/// A recorded lifecycle event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// Timestamp
    pub timestamp: Timestamp,
    /// Plugin the event belongs to
    pub plugin_id: String,
    /// Event kind
    pub kind: LifecycleEventKind,
    /// Human readable message
    pub message: String,
}

impl LifecycleEvent {
    /// Create a new event.
    pub fn new(plugin_id: &str, kind: LifecycleEventKind, message: &str) -> Self {
        Self {
            timestamp: now(),
            plugin_id: plugin_id.to_string(),
            kind,
            message: message.to_string(),
        }
    }

    /// Format as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Shared, bounded lifecycle journal.
///
/// Cloning yields another handle to the same buffer.
#[derive(Clone, Debug)]
pub struct LifecycleJournal {
    buffer: Arc<RwLock<VecDeque<LifecycleEvent>>>,
    capacity: usize,
}

impl LifecycleJournal {
    /// Create a journal keeping at most `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(RwLock::new(VecDeque::new())),
            capacity: capacity.max(1),
        }
    }

    /// Record an event and forward it to the tracing stream.
    pub fn record(&self, event: LifecycleEvent) {
        match event.kind {
            LifecycleEventKind::CleanupFailed | LifecycleEventKind::Failed => tracing::warn!(
                plugin = %event.plugin_id,
                kind = %event.kind,
                "{}",
                event.message
            ),
            LifecycleEventKind::Started | LifecycleEventKind::Stopped => tracing::info!(
                plugin = %event.plugin_id,
                kind = %event.kind,
                "{}",
                event.message
            ),
            _ => tracing::debug!(
                plugin = %event.plugin_id,
                kind = %event.kind,
                "{}",
                event.message
            ),
        }

        let Ok(mut buffer) = self.buffer.write() else {
            return;
        };
        if buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(event);
    }

    /// Shorthand for recording a freshly built event.
    pub fn emit(&self, plugin_id: &str, kind: LifecycleEventKind, message: &str) {
        self.record(LifecycleEvent::new(plugin_id, kind, message));
    }

    /// All buffered events, oldest first.
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.buffer
            .read()
            .map(|b| b.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Events recorded for one plugin.
    pub fn events_for(&self, plugin_id: &str) -> Vec<LifecycleEvent> {
        self.buffer
            .read()
            .map(|b| b.iter().filter(|e| e.plugin_id == plugin_id).cloned().collect())
            .unwrap_or_default()
    }

    /// Kinds recorded for one plugin, in order.
    pub fn kinds_for(&self, plugin_id: &str) -> Vec<LifecycleEventKind> {
        self.events_for(plugin_id).into_iter().map(|e| e.kind).collect()
    }

    /// Drop every event belonging to `plugin_id`.
    pub fn forget(&self, plugin_id: &str) {
        if let Ok(mut buffer) = self.buffer.write() {
            buffer.retain(|e| e.plugin_id != plugin_id);
        }
    }

    /// Number of buffered events.
    pub fn len(&self) -> usize {
        self.buffer.read().map(|b| b.len()).unwrap_or(0)
    }

    /// True when nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear the buffer.
    pub fn clear(&self) {
        if let Ok(mut buffer) = self.buffer.write() {
            buffer.clear();
        }
    }
}

impl Default for LifecycleJournal {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_JOURNAL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_query() {
        let journal = LifecycleJournal::default();
        journal.emit("a", LifecycleEventKind::Started, "Starting a");
        journal.emit("b", LifecycleEventKind::Started, "Starting b");
        journal.emit("a", LifecycleEventKind::Stopped, "Stopping a");

        assert_eq!(journal.len(), 3);
        assert_eq!(
            journal.kinds_for("a"),
            vec![LifecycleEventKind::Started, LifecycleEventKind::Stopped]
        );
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let journal = LifecycleJournal::with_capacity(2);
        journal.emit("a", LifecycleEventKind::Constructed, "1");
        journal.emit("a", LifecycleEventKind::Starting, "2");
        journal.emit("a", LifecycleEventKind::Started, "3");

        let events = journal.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, "2");
    }

    #[test]
    fn test_clones_share_buffer() {
        let journal = LifecycleJournal::default();
        let handle = journal.clone();
        handle.emit("a", LifecycleEventKind::Stopped, "done");
        assert_eq!(journal.len(), 1);

        journal.forget("a");
        assert!(handle.is_empty());
    }

    #[test]
    fn test_event_json() {
        let event = LifecycleEvent::new("a", LifecycleEventKind::CleanupFailed, "boom");
        let json = event.to_json();
        assert!(json.contains("CleanupFailed"));
        assert_eq!(event.kind.to_string(), "cleanup_failed");
    }
}
