// entry.rs — Journal entry data model.
//
// One entry per submitted operation, rejected ones included: a rejected
// submission is still something that happened, and recording it makes the
// journal a faithful account of what was asked of the ledger, not just of
// what it accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which ledger operation an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    CreateGoal,
    UpdateGoal,
    AbandonGoal,
    MarkGoalCompleted,
    AddMilestone,
    CompleteMilestone,
}

impl OperationKind {
    /// Short lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::CreateGoal => "create_goal",
            OperationKind::UpdateGoal => "update_goal",
            OperationKind::AbandonGoal => "abandon_goal",
            OperationKind::MarkGoalCompleted => "mark_goal_completed",
            OperationKind::AddMilestone => "add_milestone",
            OperationKind::CompleteMilestone => "complete_milestone",
        }
    }
}

/// How a submitted operation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    /// The operation was validated and committed.
    Accepted,
    /// The operation was rejected; no state changed.
    Rejected { reason: String },
}

/// A single journal entry — one line in the JSONL journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier for this entry.
    pub entry_id: Uuid,

    /// Wall-clock time the submission was recorded.
    pub recorded_at: DateTime<Utc>,

    /// The principal the operation ran as.
    pub caller: String,

    /// Which operation was submitted.
    pub operation: OperationKind,

    /// The goal the operation targeted (or created), when known.
    pub goal_id: Option<u64>,

    /// The milestone the operation targeted (or created), when known.
    pub milestone_id: Option<u64>,

    /// The block height the operation ran at.
    pub block_height: u64,

    /// Whether the ledger accepted the operation.
    pub outcome: Outcome,

    /// Hash of the previous entry's JSON line. None for the first entry.
    pub previous_hash: Option<String>,
}

impl JournalEntry {
    /// A fresh entry with an Accepted outcome and no target ids.
    pub fn new(caller: impl Into<String>, operation: OperationKind, block_height: u64) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            caller: caller.into(),
            operation,
            goal_id: None,
            milestone_id: None,
            block_height,
            outcome: Outcome::Accepted,
            previous_hash: None,
        }
    }

    /// Set the targeted goal id (builder pattern).
    pub fn with_goal(mut self, goal_id: u64) -> Self {
        self.goal_id = Some(goal_id);
        self
    }

    /// Set the targeted milestone id (builder pattern).
    pub fn with_milestone(mut self, milestone_id: u64) -> Self {
        self.milestone_id = Some(milestone_id);
        self
    }

    /// Mark the entry rejected with the ledger's reason.
    pub fn rejected(mut self, reason: impl Into<String>) -> Self {
        self.outcome = Outcome::Rejected {
            reason: reason.into(),
        };
        self
    }
}
