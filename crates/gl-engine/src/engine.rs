// engine.rs — GoalEngine: the operation surface over the substrate.
//
// Every mutating operation follows the same discipline: resolve the record
// (not-found first), check ownership, check the lifecycle gate, validate
// fields, then stage every write — records, counters, allocator advances —
// into one batch and commit it. Nothing is written before the commit, so a
// rejected operation leaves the substrate untouched. Events go out only
// after the commit succeeds.
//
// The engine assumes serialized execution: it is the substrate's only
// writer and one operation runs to completion before the next begins.

use crate::allocator::IdAllocator;
use crate::error::LedgerError;
use crate::events::{EventDispatcher, LedgerEvent};
use crate::goal::{Goal, GoalDraft, GoalStatus};
use crate::milestone::Milestone;
use crate::principal::Principal;
use crate::substrate::{StateKey, Substrate, WriteBatch};
use crate::validate;

/// The per-operation context supplied by the environment: who is calling,
/// and what block height the operation runs at.
///
/// Both are explicit arguments rather than ambient state so tests (and any
/// embedding) control them completely.
#[derive(Debug, Clone)]
pub struct TxContext {
    pub caller: Principal,
    pub block_height: u64,
}

impl TxContext {
    pub fn new(caller: Principal, block_height: u64) -> Self {
        Self {
            caller,
            block_height,
        }
    }
}

/// The goal/milestone state engine.
pub struct GoalEngine<S: Substrate> {
    substrate: S,
    allocator: IdAllocator,
    events: EventDispatcher,
}

impl<S: Substrate> GoalEngine<S> {
    /// Build an engine with no notification sinks.
    pub fn new(substrate: S) -> Self {
        Self::with_dispatcher(substrate, EventDispatcher::new())
    }

    /// Build an engine that dispatches events to the given sinks.
    pub fn with_dispatcher(substrate: S, events: EventDispatcher) -> Self {
        Self {
            substrate,
            allocator: IdAllocator::new(),
            events,
        }
    }

    // ------------------------------------------------------------------
    // Goal operations
    // ------------------------------------------------------------------

    /// Create a goal owned by the caller. Returns the new goal id.
    pub fn create_goal(&mut self, ctx: &TxContext, draft: GoalDraft) -> Result<u64, LedgerError> {
        validate::validate_goal_draft(&draft, ctx.block_height)?;

        let mut batch = WriteBatch::new();
        let goal_id = self.allocator.next_goal_id(&self.substrate, &mut batch)?;
        let goal = Goal::new(goal_id, ctx.caller.clone(), draft, ctx.block_height);
        batch.put(StateKey::Goal(goal_id), &goal)?;
        self.substrate.commit(batch)?;

        tracing::debug!(goal_id, owner = %goal.owner, "goal created");
        self.events.dispatch(&LedgerEvent::GoalCreated {
            goal_id,
            owner: goal.owner.to_string(),
            title: goal.title.clone(),
            block_height: ctx.block_height,
        });
        Ok(goal_id)
    }

    /// Replace a goal's mutable fields. Owner-only; same validation as
    /// creation.
    pub fn update_goal(
        &mut self,
        ctx: &TxContext,
        goal_id: u64,
        draft: GoalDraft,
    ) -> Result<(), LedgerError> {
        let mut goal = self.load_owned_goal(ctx, goal_id)?;
        validate::validate_goal_draft(&draft, ctx.block_height)?;

        goal.title = draft.title;
        goal.description = draft.description;
        goal.deadline = draft.deadline;
        goal.priority = draft.priority;
        goal.category = draft.category;
        goal.weight = draft.weight;
        goal.updated_at_height = ctx.block_height;

        let mut batch = WriteBatch::new();
        batch.put(StateKey::Goal(goal_id), &goal)?;
        self.substrate.commit(batch)?;

        tracing::debug!(goal_id, "goal updated");
        self.events.dispatch(&LedgerEvent::GoalUpdated {
            goal_id,
            block_height: ctx.block_height,
        });
        Ok(())
    }

    /// Abandon a goal. Owner-only; fails from a terminal status.
    pub fn abandon_goal(&mut self, ctx: &TxContext, goal_id: u64) -> Result<(), LedgerError> {
        let mut goal = self.load_owned_goal(ctx, goal_id)?;
        goal.transition(GoalStatus::Abandoned, ctx.block_height)?;

        let mut batch = WriteBatch::new();
        batch.put(StateKey::Goal(goal_id), &goal)?;
        self.substrate.commit(batch)?;

        tracing::debug!(goal_id, "goal abandoned");
        self.events.dispatch(&LedgerEvent::GoalAbandoned {
            goal_id,
            block_height: ctx.block_height,
        });
        Ok(())
    }

    /// Explicitly complete a goal, regardless of its milestone ratio.
    /// Owner-only; fails from a terminal status.
    pub fn mark_goal_completed(
        &mut self,
        ctx: &TxContext,
        goal_id: u64,
    ) -> Result<(), LedgerError> {
        let mut goal = self.load_owned_goal(ctx, goal_id)?;
        goal.transition(GoalStatus::Completed, ctx.block_height)?;

        let mut batch = WriteBatch::new();
        batch.put(StateKey::Goal(goal_id), &goal)?;
        self.substrate.commit(batch)?;

        tracing::debug!(goal_id, "goal explicitly completed");
        self.events.dispatch(&LedgerEvent::GoalCompleted {
            goal_id,
            milestone_count: goal.milestone_count,
            completed_milestone_count: goal.completed_milestone_count,
            block_height: ctx.block_height,
        });
        Ok(())
    }

    /// Look up a goal. Missing ids are `None`, not an error.
    pub fn get_goal(&self, goal_id: u64) -> Result<Option<Goal>, LedgerError> {
        Ok(self.substrate.get_record(&StateKey::Goal(goal_id))?)
    }

    /// All goals, ascending by id.
    pub fn list_goals(&self) -> Result<Vec<Goal>, LedgerError> {
        let last = self.allocator.last_goal_id(&self.substrate)?;
        let mut goals = Vec::new();
        for goal_id in 1..=last {
            if let Some(goal) = self.get_goal(goal_id)? {
                goals.push(goal);
            }
        }
        Ok(goals)
    }

    // ------------------------------------------------------------------
    // Milestone operations
    // ------------------------------------------------------------------

    /// Add a milestone to a goal. Owner-only; the goal must not be
    /// terminal. Returns the new milestone id (scoped to the goal).
    pub fn add_milestone(
        &mut self,
        ctx: &TxContext,
        goal_id: u64,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<u64, LedgerError> {
        let mut goal = self.load_owned_goal(ctx, goal_id)?;
        self.ensure_open(&goal)?;

        let title = title.into();
        let description = description.into();
        validate::validate_title("title", &title)?;
        validate::validate_description("description", &description)?;

        let mut batch = WriteBatch::new();
        let milestone_id = self
            .allocator
            .next_milestone_id(&self.substrate, goal_id, &mut batch)?;
        let milestone = Milestone::new(goal_id, milestone_id, title, description, ctx.block_height);

        goal.milestone_count += 1;
        goal.updated_at_height = ctx.block_height;

        batch.put(
            StateKey::Milestone {
                goal_id,
                milestone_id,
            },
            &milestone,
        )?;
        batch.put(StateKey::Goal(goal_id), &goal)?;
        self.substrate.commit(batch)?;

        tracing::debug!(goal_id, milestone_id, "milestone added");
        self.events.dispatch(&LedgerEvent::MilestoneAdded {
            goal_id,
            milestone_id,
            title: milestone.title.clone(),
            block_height: ctx.block_height,
        });
        Ok(milestone_id)
    }

    /// Complete a milestone. Owner-only; fails if the goal is terminal or
    /// the milestone is already completed. When the last open milestone
    /// completes, the goal transitions to Completed in the same commit.
    pub fn complete_milestone(
        &mut self,
        ctx: &TxContext,
        goal_id: u64,
        milestone_id: u64,
    ) -> Result<(), LedgerError> {
        let mut goal = self.load_owned_goal(ctx, goal_id)?;
        self.ensure_open(&goal)?;

        let key = StateKey::Milestone {
            goal_id,
            milestone_id,
        };
        let mut milestone: Milestone = self
            .substrate
            .get_record(&key)?
            .ok_or(LedgerError::MilestoneNotFound {
                goal_id,
                milestone_id,
            })?;
        milestone.complete(ctx.block_height)?;

        goal.completed_milestone_count += 1;
        goal.updated_at_height = ctx.block_height;
        debug_assert!(goal.completed_milestone_count <= goal.milestone_count);

        // Derived completion: the last open milestone closes the goal.
        let all_done = goal.completed_milestone_count == goal.milestone_count;
        if all_done {
            goal.transition(GoalStatus::Completed, ctx.block_height)?;
        }

        let mut batch = WriteBatch::new();
        batch.put(key, &milestone)?;
        batch.put(StateKey::Goal(goal_id), &goal)?;
        self.substrate.commit(batch)?;

        tracing::debug!(goal_id, milestone_id, "milestone completed");
        self.events.dispatch(&LedgerEvent::MilestoneCompleted {
            goal_id,
            milestone_id,
            block_height: ctx.block_height,
        });
        if all_done {
            self.events.dispatch(&LedgerEvent::GoalCompleted {
                goal_id,
                milestone_count: goal.milestone_count,
                completed_milestone_count: goal.completed_milestone_count,
                block_height: ctx.block_height,
            });
        }
        Ok(())
    }

    /// Look up a milestone. Missing ids are `None`, not an error.
    pub fn get_milestone(
        &self,
        goal_id: u64,
        milestone_id: u64,
    ) -> Result<Option<Milestone>, LedgerError> {
        Ok(self.substrate.get_record(&StateKey::Milestone {
            goal_id,
            milestone_id,
        })?)
    }

    /// A goal's milestones, ascending by milestone id. An unknown goal id
    /// yields an empty list.
    pub fn list_milestones(&self, goal_id: u64) -> Result<Vec<Milestone>, LedgerError> {
        let last = self.allocator.last_milestone_id(&self.substrate, goal_id)?;
        let mut milestones = Vec::new();
        for milestone_id in 1..=last {
            if let Some(milestone) = self.get_milestone(goal_id, milestone_id)? {
                milestones.push(milestone);
            }
        }
        Ok(milestones)
    }

    // ------------------------------------------------------------------
    // Shared checks
    // ------------------------------------------------------------------

    fn load_owned_goal(&self, ctx: &TxContext, goal_id: u64) -> Result<Goal, LedgerError> {
        let goal: Goal = self
            .substrate
            .get_record(&StateKey::Goal(goal_id))?
            .ok_or(LedgerError::GoalNotFound { goal_id })?;
        if goal.owner != ctx.caller {
            return Err(LedgerError::Unauthorized {
                goal_id,
                caller: ctx.caller.clone(),
            });
        }
        Ok(goal)
    }

    fn ensure_open(&self, goal: &Goal) -> Result<(), LedgerError> {
        if goal.status.is_terminal() {
            return Err(LedgerError::GoalTerminal {
                goal_id: goal.id,
                status: goal.status.to_string(),
            });
        }
        Ok(())
    }
}
