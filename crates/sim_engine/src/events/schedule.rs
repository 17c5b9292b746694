//! Scheduled task queue keyed by due tick
//!
//! Replaces repeating timers: a repeating task reschedules itself when it
//! fires, and cancellation removes the pending entry from the queue.

use std::collections::{BTreeMap, HashMap};

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// Queue of tasks ordered by due tick, then by scheduling order
#[derive(Debug)]
pub struct TaskQueue<T> {
    pending: BTreeMap<(u64, TaskId), T>,
    due_ticks: HashMap<TaskId, u64>,
    next_id: u64,
}

impl<T> TaskQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
            due_ticks: HashMap::new(),
            next_id: 0,
        }
    }

    /// Schedule `task` to fire on `due_tick`
    pub fn schedule(&mut self, due_tick: u64, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.insert((due_tick, id), task);
        self.due_ticks.insert(id, due_tick);
        id
    }

    /// Remove a pending task
    ///
    /// Returns `false` if the task already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.due_ticks.remove(&id) {
            Some(due) => self.pending.remove(&(due, id)).is_some(),
            None => false,
        }
    }

    /// Whether a task is still waiting to fire
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.due_ticks.contains_key(&id)
    }

    /// Tick a pending task is due on
    pub fn due_tick(&self, id: TaskId) -> Option<u64> {
        self.due_ticks.get(&id).copied()
    }

    /// Remove and return every task due at or before `now`, in firing order
    pub fn drain_due(&mut self, now: u64) -> Vec<T> {
        self.drain_due_with_ids(now)
            .into_iter()
            .map(|(_, task)| task)
            .collect()
    }

    /// Like [`TaskQueue::drain_due`], keeping the task ids
    pub fn drain_due_with_ids(&mut self, now: u64) -> Vec<(TaskId, T)> {
        let due = match now.checked_add(1) {
            Some(next) => {
                let later = self.pending.split_off(&(next, TaskId(0)));
                std::mem::replace(&mut self.pending, later)
            }
            None => std::mem::take(&mut self.pending),
        };
        due.into_iter()
            .map(|((_, id), task)| {
                self.due_ticks.remove(&id);
                (id, task)
            })
            .collect()
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending task
    pub fn clear(&mut self) {
        self.pending.clear();
        self.due_ticks.clear();
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_fire_in_due_order() {
        let mut queue = TaskQueue::new();
        queue.schedule(5, "late");
        queue.schedule(2, "early");
        queue.schedule(3, "middle");

        assert!(queue.drain_due(1).is_empty());
        assert_eq!(queue.drain_due(3), vec!["early", "middle"]);
        assert_eq!(queue.drain_due(10), vec!["late"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_same_tick_keeps_scheduling_order() {
        let mut queue = TaskQueue::new();
        queue.schedule(4, 'a');
        queue.schedule(4, 'b');
        queue.schedule(4, 'c');
        assert_eq!(queue.drain_due(4), vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_cancel_removes_pending_task() {
        let mut queue = TaskQueue::new();
        let keep = queue.schedule(2, "keep");
        let drop = queue.schedule(2, "drop");

        assert!(queue.cancel(drop));
        assert!(!queue.cancel(drop));
        assert!(!queue.is_pending(drop));
        assert!(queue.is_pending(keep));
        assert_eq!(queue.drain_due(2), vec!["keep"]);
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut queue = TaskQueue::new();
        let id = queue.schedule(1, ());
        assert_eq!(queue.drain_due(1).len(), 1);
        assert!(!queue.cancel(id));
        assert_eq!(queue.due_tick(id), None);
    }

    #[test]
    fn test_drain_at_max_tick() {
        let mut queue = TaskQueue::new();
        queue.schedule(u64::MAX, 1);
        assert_eq!(queue.drain_due(u64::MAX), vec![1]);
    }

    #[test]
    fn test_clear() {
        let mut queue = TaskQueue::new();
        let id = queue.schedule(1, 0);
        queue.clear();
        assert!(queue.is_empty());
        assert!(!queue.is_pending(id));
    }
}
