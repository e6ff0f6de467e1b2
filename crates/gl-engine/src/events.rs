// events.rs — Event model and notification dispatch.
//
// The engine emits an event after every committed operation. Sinks decide
// what to do with them: append to a JSONL file, feed an indexer, notify a
// UI. A sink failure is logged and swallowed — events are observability,
// and a broken sink must never fail a committed operation or block the
// other sinks.
//
// Events carry the block height the operation applied at, not a wall-clock
// time: the engine has no clock, and heights keep replayed histories
// identical.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::substrate::StorageFault;

/// Events emitted at each committed ledger operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A goal was created.
    GoalCreated {
        goal_id: u64,
        owner: String,
        title: String,
        block_height: u64,
    },

    /// A goal's mutable fields were replaced.
    GoalUpdated { goal_id: u64, block_height: u64 },

    /// A goal reached Completed — either derived (every milestone done)
    /// or explicit. The counters tell the two apart.
    GoalCompleted {
        goal_id: u64,
        milestone_count: u64,
        completed_milestone_count: u64,
        block_height: u64,
    },

    /// A goal was explicitly abandoned by its owner.
    GoalAbandoned { goal_id: u64, block_height: u64 },

    /// A milestone was added to a goal.
    MilestoneAdded {
        goal_id: u64,
        milestone_id: u64,
        title: String,
        block_height: u64,
    },

    /// A milestone was completed.
    MilestoneCompleted {
        goal_id: u64,
        milestone_id: u64,
        block_height: u64,
    },
}

impl LedgerEvent {
    /// The event type name as a string.
    pub fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::GoalCreated { .. } => "goal_created",
            LedgerEvent::GoalUpdated { .. } => "goal_updated",
            LedgerEvent::GoalCompleted { .. } => "goal_completed",
            LedgerEvent::GoalAbandoned { .. } => "goal_abandoned",
            LedgerEvent::MilestoneAdded { .. } => "milestone_added",
            LedgerEvent::MilestoneCompleted { .. } => "milestone_completed",
        }
    }

    /// The goal the event concerns.
    pub fn goal_id(&self) -> u64 {
        match self {
            LedgerEvent::GoalCreated { goal_id, .. }
            | LedgerEvent::GoalUpdated { goal_id, .. }
            | LedgerEvent::GoalCompleted { goal_id, .. }
            | LedgerEvent::GoalAbandoned { goal_id, .. }
            | LedgerEvent::MilestoneAdded { goal_id, .. }
            | LedgerEvent::MilestoneCompleted { goal_id, .. } => *goal_id,
        }
    }
}

/// Trait for receiving ledger events.
pub trait NotificationSink: Send {
    /// Handle an event. Errors are logged but don't stop the system.
    fn send(&self, event: &LedgerEvent) -> Result<(), LedgerError>;
}

/// Appends events as JSONL to a file.
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl NotificationSink for LogSink {
    fn send(&self, event: &LedgerEvent) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageFault::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| StorageFault::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        let json = serde_json::to_string(event).map_err(|source| StorageFault::Encode {
            key: self.path.display().to_string(),
            source,
        })?;
        writeln!(file, "{}", json).map_err(|source| StorageFault::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        Ok(())
    }
}

/// Dispatches events to multiple sinks.
#[derive(Default)]
pub struct EventDispatcher {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl EventDispatcher {
    /// Create a new dispatcher with no sinks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notification sink.
    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    /// Dispatch an event to all sinks. A failing sink does not prevent
    /// the others from receiving the event.
    pub fn dispatch(&self, event: &LedgerEvent) {
        for sink in &self.sinks {
            if let Err(e) = sink.send(event) {
                tracing::warn!("notification sink error: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn created(goal_id: u64) -> LedgerEvent {
        LedgerEvent::GoalCreated {
            goal_id,
            owner: "alice".to_string(),
            title: "Test".to_string(),
            block_height: 5,
        }
    }

    #[test]
    fn event_serialization_round_trip() {
        let event = created(1);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"goal_created\""));
        let restored: LedgerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.event_type(), "goal_created");
        assert_eq!(restored.goal_id(), 1);
    }

    #[test]
    fn event_type_names() {
        assert_eq!(created(1).event_type(), "goal_created");
        assert_eq!(
            LedgerEvent::MilestoneCompleted {
                goal_id: 1,
                milestone_id: 2,
                block_height: 9
            }
            .event_type(),
            "milestone_completed"
        );
    }

    #[test]
    fn log_sink_appends_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let sink = LogSink::new(&path);

        sink.send(&created(1)).unwrap();
        sink.send(&created(2)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn log_sink_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/events.jsonl");
        LogSink::new(&path).send(&created(1)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn dispatcher_sends_to_all_sinks() {
        let dir = tempdir().unwrap();
        let path1 = dir.path().join("sink1.jsonl");
        let path2 = dir.path().join("sink2.jsonl");

        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_sink(Box::new(LogSink::new(&path1)));
        dispatcher.add_sink(Box::new(LogSink::new(&path2)));

        dispatcher.dispatch(&created(1));

        assert!(fs::read_to_string(&path1).unwrap().contains("goal_created"));
        assert!(fs::read_to_string(&path2).unwrap().contains("goal_created"));
    }
}
