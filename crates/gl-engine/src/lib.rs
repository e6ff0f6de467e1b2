//! # gl-engine
//!
//! Deterministic goal/milestone state engine for Goal Ledger.
//!
//! A [`Goal`] is a tracked objective owned by the [`Principal`] that created
//! it; a [`Milestone`] is a completable sub-task belonging to exactly one
//! goal. The engine enforces ownership, field validity, and the goal
//! lifecycle across every mutation, and derives progress and completion
//! from the milestone counters.
//!
//! The engine is deliberately cut off from its environment. It never reads
//! a clock, never generates randomness, and never touches the filesystem on
//! its own: caller identity and the current block height arrive in a
//! [`TxContext`], and all state lives behind the [`Substrate`] trait, which
//! commits each operation's writes as one all-or-nothing batch.
//!
//! ## Key components
//!
//! - [`GoalEngine`] — the operation surface (create/update/abandon/complete
//!   goals, add/complete milestones, read accessors)
//! - [`Goal`] / [`Milestone`] — the two record kinds and their lifecycle rules
//! - [`IdAllocator`] — monotonic identifier allocation as substrate state
//! - [`Substrate`] — the persistence seam, with [`MemorySubstrate`] and
//!   [`FileSubstrate`] implementations
//! - [`LedgerEvent`] — events emitted after each committed operation

pub mod allocator;
pub mod engine;
pub mod error;
pub mod events;
pub mod file_substrate;
pub mod goal;
pub mod milestone;
pub mod principal;
pub mod substrate;
pub mod validate;

pub use allocator::IdAllocator;
pub use engine::{GoalEngine, TxContext};
pub use error::LedgerError;
pub use events::{EventDispatcher, LedgerEvent, LogSink, NotificationSink};
pub use file_substrate::FileSubstrate;
pub use goal::{Goal, GoalDraft, GoalStatus};
pub use milestone::Milestone;
pub use principal::Principal;
pub use substrate::{MemorySubstrate, StateKey, StorageFault, Substrate, WriteBatch};
