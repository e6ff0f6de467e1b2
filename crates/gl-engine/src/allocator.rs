// allocator.rs — Monotonic identifier allocation.
//
// Counters are ordinary substrate state, not process globals. An
// allocation reads the last committed value and stages the advanced
// counter into the caller's WriteBatch, so the counter and the record it
// identifies commit together — or not at all. If the operation is
// rejected after allocation, the staged counter is simply dropped and the
// id is handed out again next time.

use crate::substrate::{StateKey, StorageFault, Substrate, WriteBatch};

/// Issues goal ids (one global scope) and milestone ids (one scope per
/// goal). Each call returns a value strictly greater than every value
/// previously committed for that scope.
///
/// Constructed once per engine; holds no state of its own. At most one
/// allocation per scope may be staged into a single batch, which is all
/// any ledger operation needs.
#[derive(Debug, Default)]
pub struct IdAllocator;

impl IdAllocator {
    pub fn new() -> Self {
        Self
    }

    /// Allocate the next goal id and stage the advanced counter.
    pub fn next_goal_id<S: Substrate>(
        &self,
        substrate: &S,
        batch: &mut WriteBatch,
    ) -> Result<u64, StorageFault> {
        let last: u64 = substrate
            .get_record(&StateKey::GoalCounter)?
            .unwrap_or(0);
        let next = last + 1;
        batch.put(StateKey::GoalCounter, &next)?;
        Ok(next)
    }

    /// Allocate the next milestone id for `goal_id` and stage the advanced
    /// counter.
    pub fn next_milestone_id<S: Substrate>(
        &self,
        substrate: &S,
        goal_id: u64,
        batch: &mut WriteBatch,
    ) -> Result<u64, StorageFault> {
        let last: u64 = substrate
            .get_record(&StateKey::MilestoneCounter(goal_id))?
            .unwrap_or(0);
        let next = last + 1;
        batch.put(StateKey::MilestoneCounter(goal_id), &next)?;
        Ok(next)
    }

    /// The highest goal id committed so far (0 if none).
    pub fn last_goal_id<S: Substrate>(&self, substrate: &S) -> Result<u64, StorageFault> {
        Ok(substrate
            .get_record(&StateKey::GoalCounter)?
            .unwrap_or(0))
    }

    /// The highest milestone id committed for `goal_id` (0 if none).
    pub fn last_milestone_id<S: Substrate>(
        &self,
        substrate: &S,
        goal_id: u64,
    ) -> Result<u64, StorageFault> {
        Ok(substrate
            .get_record(&StateKey::MilestoneCounter(goal_id))?
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substrate::MemorySubstrate;

    fn allocate_goal(sub: &mut MemorySubstrate) -> u64 {
        let alloc = IdAllocator::new();
        let mut batch = WriteBatch::new();
        let id = alloc.next_goal_id(sub, &mut batch).unwrap();
        sub.commit(batch).unwrap();
        id
    }

    #[test]
    fn goal_ids_start_at_one_and_increase() {
        let mut sub = MemorySubstrate::new();
        assert_eq!(allocate_goal(&mut sub), 1);
        assert_eq!(allocate_goal(&mut sub), 2);
        assert_eq!(allocate_goal(&mut sub), 3);
    }

    #[test]
    fn uncommitted_allocation_is_not_consumed() {
        let mut sub = MemorySubstrate::new();
        let alloc = IdAllocator::new();

        // Stage an allocation and drop the batch without committing.
        let mut batch = WriteBatch::new();
        assert_eq!(alloc.next_goal_id(&sub, &mut batch).unwrap(), 1);
        drop(batch);

        // The id is reissued on the next attempt.
        assert_eq!(allocate_goal(&mut sub), 1);
    }

    #[test]
    fn milestone_ids_are_scoped_per_goal() {
        let mut sub = MemorySubstrate::new();
        let alloc = IdAllocator::new();

        for expected in 1..=3u64 {
            let mut batch = WriteBatch::new();
            let id = alloc.next_milestone_id(&sub, 7, &mut batch).unwrap();
            sub.commit(batch).unwrap();
            assert_eq!(id, expected);
        }

        // A different goal starts from 1 again.
        let mut batch = WriteBatch::new();
        assert_eq!(alloc.next_milestone_id(&sub, 8, &mut batch).unwrap(), 1);
    }

    #[test]
    fn counters_survive_alongside_record_writes() {
        let mut sub = MemorySubstrate::new();
        let alloc = IdAllocator::new();

        let mut batch = WriteBatch::new();
        let id = alloc.next_goal_id(&sub, &mut batch).unwrap();
        batch.put(StateKey::Goal(id), &"record").unwrap();
        sub.commit(batch).unwrap();

        assert_eq!(alloc.last_goal_id(&sub).unwrap(), 1);
        assert!(sub.get(&StateKey::Goal(1)).unwrap().is_some());
    }

    #[test]
    fn last_ids_default_to_zero() {
        let sub = MemorySubstrate::new();
        let alloc = IdAllocator::new();
        assert_eq!(alloc.last_goal_id(&sub).unwrap(), 0);
        assert_eq!(alloc.last_milestone_id(&sub, 1).unwrap(), 0);
    }
}
