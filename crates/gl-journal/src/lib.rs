//! # gl-journal
//!
//! Append-only, hash-chained operation journal for Goal Ledger.
//!
//! Every operation submitted to the ledger — accepted or rejected — can be
//! recorded as a [`JournalEntry`]. Entries are stored as JSONL, one object
//! per line, and each entry carries the SHA-256 hash of the previous line,
//! so inserting, deleting, or editing history breaks the chain in a way
//! [`OperationJournal::verify_chain`] detects.
//!
//! The journal sits outside the deterministic engine: it records wall-clock
//! receipt times and random entry ids, which is exactly why the engine does
//! not depend on it.

pub mod entry;
pub mod error;
pub mod hasher;
pub mod journal;

pub use entry::{JournalEntry, OperationKind, Outcome};
pub use error::JournalError;
pub use journal::OperationJournal;
