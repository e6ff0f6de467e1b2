// goal.rs — Goal: the top-level tracked objective.
//
// A goal is created Active and may move to exactly one of two terminal
// statuses: Completed (every milestone done, or an explicit completion by
// the owner) or Abandoned (explicit only). Terminal statuses never revert.
//
// Progress is derived from the two milestone counters on every read and is
// never stored, so it cannot drift from the counters that define it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::principal::Principal;

/// The lifecycle status of a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Open for updates and milestone work.
    Active,

    /// All milestones done, or explicitly completed by the owner. Terminal.
    Completed,

    /// Explicitly given up by the owner. Terminal.
    Abandoned,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalStatus::Active => write!(f, "active"),
            GoalStatus::Completed => write!(f, "completed"),
            GoalStatus::Abandoned => write!(f, "abandoned"),
        }
    }
}

impl GoalStatus {
    /// Whether this status admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GoalStatus::Active)
    }

    /// Check whether moving from this status to `next` is valid.
    ///
    /// The graph is small: Active → Completed, Active → Abandoned.
    /// Both destinations are terminal.
    pub fn can_transition_to(&self, next: GoalStatus) -> bool {
        matches!(
            (self, next),
            (GoalStatus::Active, GoalStatus::Completed)
                | (GoalStatus::Active, GoalStatus::Abandoned)
        )
    }
}

/// The caller-supplied fields of a goal.
///
/// The same shape serves creation and update: an update replaces the whole
/// mutable field set. Identity, ownership, status, and the milestone
/// counters are engine-managed and have no place here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalDraft {
    /// Short ASCII label, at most 64 characters.
    pub title: String,
    /// Longer UTF-8 text, at most 256 characters.
    pub description: String,
    /// Optional block height the goal should be done by. Must be in the
    /// future at submission time.
    pub deadline: Option<u64>,
    /// Urgency from 1 (highest) to 5.
    pub priority: u8,
    /// Optional opaque reference to a caller-defined classification.
    pub category: Option<u64>,
    /// Scales progress reporting; must be positive.
    pub weight: u64,
}

/// A goal record as persisted in the substrate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Allocator-issued identifier. Immutable.
    pub id: u64,

    /// The principal that created the goal. Immutable; sole authority for
    /// every mutation of the goal and its milestones.
    pub owner: Principal,

    pub title: String,
    pub description: String,
    pub deadline: Option<u64>,
    pub priority: u8,
    pub category: Option<u64>,
    pub weight: u64,

    /// Current lifecycle status.
    pub status: GoalStatus,

    /// Number of milestones ever added to this goal.
    pub milestone_count: u64,

    /// Number of those milestones that are completed. Never exceeds
    /// `milestone_count`.
    pub completed_milestone_count: u64,

    /// Block height at which the goal was created.
    pub created_at_height: u64,

    /// Block height of the last accepted mutation.
    pub updated_at_height: u64,
}

impl Goal {
    /// Build a fresh Active goal from a validated draft.
    pub fn new(id: u64, owner: Principal, draft: GoalDraft, height: u64) -> Self {
        Self {
            id,
            owner,
            title: draft.title,
            description: draft.description,
            deadline: draft.deadline,
            priority: draft.priority,
            category: draft.category,
            weight: draft.weight,
            status: GoalStatus::Active,
            milestone_count: 0,
            completed_milestone_count: 0,
            created_at_height: height,
            updated_at_height: height,
        }
    }

    /// Move to a new status. Returns an error for any move the lifecycle
    /// graph does not allow — in particular, anything out of a terminal
    /// status.
    pub fn transition(&mut self, next: GoalStatus, height: u64) -> Result<(), LedgerError> {
        if !self.status.can_transition_to(next) {
            return Err(LedgerError::InvalidTransition {
                goal_id: self.id,
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        self.updated_at_height = height;
        Ok(())
    }

    /// Completion ratio as an integer percentage (0–100).
    ///
    /// A goal with no milestones reports 0, not an error.
    pub fn progress_percent(&self) -> u64 {
        if self.milestone_count == 0 {
            0
        } else {
            self.completed_milestone_count * 100 / self.milestone_count
        }
    }

    /// Completion scaled by the goal's weight: `weight * done / total`.
    pub fn weighted_progress(&self) -> u64 {
        if self.milestone_count == 0 {
            0
        } else {
            self.weight * self.completed_milestone_count / self.milestone_count
        }
    }
}
