// substrate.rs — The persistence seam: typed keys, write batches, and the
// Substrate trait.
//
// The engine is the substrate's only writer and each operation commits
// exactly once: every record write and counter advance for the operation
// goes into one WriteBatch, and the substrate applies the batch
// all-or-nothing. There is no partial visibility and no rollback to
// implement — an operation that fails validation simply never commits.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// A typed key into the substrate mapping.
///
/// Keys have a stable string encoding so any keyed backend (an in-memory
/// map, a JSON snapshot, a real KV store) can hold the same state.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateKey {
    /// A goal record, keyed by goal id.
    Goal(u64),
    /// A milestone record, keyed by (goal id, milestone id).
    Milestone { goal_id: u64, milestone_id: u64 },
    /// The global goal id counter.
    GoalCounter,
    /// The per-goal milestone id counter.
    MilestoneCounter(u64),
}

impl StateKey {
    /// Stable string form, e.g. `goal/3` or `milestone/3/1`.
    pub fn encode(&self) -> String {
        match self {
            StateKey::Goal(id) => format!("goal/{id}"),
            StateKey::Milestone {
                goal_id,
                milestone_id,
            } => format!("milestone/{goal_id}/{milestone_id}"),
            StateKey::GoalCounter => "counter/goals".to_string(),
            StateKey::MilestoneCounter(goal_id) => format!("counter/milestones/{goal_id}"),
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// A substrate failure. Fatal for the operation that hit it.
#[derive(Debug, Error)]
pub enum StorageFault {
    /// The backing medium failed.
    #[error("I/O failure at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A stored value did not decode as the expected record shape.
    #[error("corrupt record at {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded for storage.
    #[error("could not encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// An ordered set of writes applied together.
#[derive(Debug, Default)]
pub struct WriteBatch {
    writes: Vec<(StateKey, Vec<u8>)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a JSON-encoded record under `key`.
    pub fn put<T: Serialize>(&mut self, key: StateKey, value: &T) -> Result<(), StorageFault> {
        let bytes = serde_json::to_vec(value).map_err(|source| StorageFault::Encode {
            key: key.encode(),
            source,
        })?;
        self.writes.push((key, bytes));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn into_writes(self) -> Vec<(StateKey, Vec<u8>)> {
        self.writes
    }
}

/// A keyed, durable mapping with all-or-nothing batch commit.
///
/// Implementations must guarantee that after `commit` returns `Ok`, every
/// write in the batch is visible, and after it returns `Err`, none are.
pub trait Substrate {
    /// Read the raw bytes stored under `key`, if any.
    fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StorageFault>;

    /// Apply every write in `batch` atomically.
    fn commit(&mut self, batch: WriteBatch) -> Result<(), StorageFault>;

    /// Read and decode the record stored under `key`, if any.
    fn get_record<T: DeserializeOwned>(&self, key: &StateKey) -> Result<Option<T>, StorageFault>
    where
        Self: Sized,
    {
        match self.get(key)? {
            None => Ok(None),
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|source| {
                    StorageFault::Corrupt {
                        key: key.encode(),
                        source,
                    }
                })?;
                Ok(Some(value))
            }
        }
    }
}

/// An in-memory substrate for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySubstrate {
    map: BTreeMap<String, Vec<u8>>,
}

impl MemorySubstrate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Substrate for MemorySubstrate {
    fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StorageFault> {
        Ok(self.map.get(&key.encode()).cloned())
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<(), StorageFault> {
        // A BTreeMap insert cannot fail, so applying in order is already
        // all-or-nothing.
        for (key, bytes) in batch.into_writes() {
            self.map.insert(key.encode(), bytes);
        }
        Ok(())
    }
}
