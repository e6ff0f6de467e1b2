// milestone.rs — Milestone: a completable sub-task of one goal.
//
// Milestones belong to exactly one goal and live as long as the goal's
// record does. They carry a single one-way flag: incomplete → completed.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A milestone record as persisted in the substrate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    /// The owning goal. Milestone ids are only unique within it.
    pub goal_id: u64,

    /// Allocator-issued identifier, scoped to the goal.
    pub milestone_id: u64,

    pub title: String,
    pub description: String,

    /// Set exactly once by completion.
    pub completed: bool,

    /// Block height at which the milestone was added.
    pub added_at_height: u64,

    /// Block height of completion, if completed.
    pub completed_at_height: Option<u64>,
}

impl Milestone {
    /// Build a fresh, incomplete milestone.
    pub fn new(
        goal_id: u64,
        milestone_id: u64,
        title: impl Into<String>,
        description: impl Into<String>,
        height: u64,
    ) -> Self {
        Self {
            goal_id,
            milestone_id,
            title: title.into(),
            description: description.into(),
            completed: false,
            added_at_height: height,
            completed_at_height: None,
        }
    }

    /// Mark the milestone completed. Fails if it already is — completion
    /// is not idempotent, so a double submission surfaces as an error
    /// instead of silently recounting.
    pub fn complete(&mut self, height: u64) -> Result<(), LedgerError> {
        if self.completed {
            return Err(LedgerError::MilestoneAlreadyCompleted {
                goal_id: self.goal_id,
                milestone_id: self.milestone_id,
            });
        }
        self.completed = true;
        self.completed_at_height = Some(height);
        Ok(())
    }
}
