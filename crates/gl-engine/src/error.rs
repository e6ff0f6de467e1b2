// error.rs — Error types for the ledger engine.
//
// Every operation returns the most specific failure it can name. Callers
// can rely on the variant, not just the message: validation failures carry
// the offending field, authorization failures carry the rejected caller,
// state failures carry the state that blocked the operation.

use thiserror::Error;

use crate::principal::Principal;
use crate::substrate::StorageFault;

/// Errors produced by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An input field is malformed or out of range. Recoverable — correct
    /// the field and resubmit.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// The referenced goal does not exist.
    #[error("goal {goal_id} not found")]
    GoalNotFound { goal_id: u64 },

    /// The referenced milestone does not exist on the given goal.
    #[error("milestone {milestone_id} not found on goal {goal_id}")]
    MilestoneNotFound { goal_id: u64, milestone_id: u64 },

    /// The caller is not the goal's owner. A policy violation — callers
    /// should not blindly retry this.
    #[error("{caller} is not the owner of goal {goal_id}")]
    Unauthorized { goal_id: u64, caller: Principal },

    /// The goal cannot move from its current status to the requested one.
    #[error("goal {goal_id} cannot transition from {from} to {to}")]
    InvalidTransition {
        goal_id: u64,
        from: String,
        to: String,
    },

    /// The goal has reached a terminal status and its milestones can no
    /// longer change.
    #[error("goal {goal_id} is {status}; milestones can no longer change")]
    GoalTerminal { goal_id: u64, status: String },

    /// The milestone was already completed. Completion happens exactly once.
    #[error("milestone {milestone_id} on goal {goal_id} is already completed")]
    MilestoneAlreadyCompleted { goal_id: u64, milestone_id: u64 },

    /// The persistence substrate failed. Fatal for the current operation;
    /// the engine never retries internally.
    #[error(transparent)]
    Storage(#[from] StorageFault),
}
