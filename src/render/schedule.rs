//! Deferred removal tasks on a virtual clock.
//!
//! Every task carries the generation of the visual it targets. The scene
//! refuses to apply a task whose generation no longer matches the live
//! visual, so a removal scheduled for an old lifetime can never delete a
//! visual recreated under the same key.

use super::visual::{EdgeKey, Generation};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Task {
    RemoveNode { id: String, generation: Generation },
    RemoveEdge { key: EdgeKey, generation: Generation },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Scheduled {
    due: Duration,
    seq: u64,
    task: Task,
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of tasks keyed by due time, FIFO among equal due times.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    queue: BinaryHeap<Reverse<Scheduled>>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|Reverse(s)| s.due)
    }

    /// Schedule `task` to run `delay` after the current clock time.
    /// Due times saturate at `Duration::MAX`.
    pub fn schedule_in(&mut self, delay: Duration, task: Task) -> Duration {
        let due = self.now.saturating_add(delay);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Scheduled { due, seq, task }));
        due
    }

    pub fn advance(&mut self, by: Duration) {
        self.now = self.now.saturating_add(by);
    }

    /// Pop every task due at or before the current clock time, in order.
    pub fn drain_due(&mut self) -> Vec<Task> {
        let mut due = Vec::new();
        while let Some(Reverse(next)) = self.queue.peek() {
            if next.due > self.now {
                break;
            }
            if let Some(Reverse(scheduled)) = self.queue.pop() {
                due.push(scheduled.task);
            }
        }
        due
    }

    /// Drop pending tasks that match `predicate`, returning how many went.
    /// Rebuilds the heap, so callers batch their cancellations.
    pub fn cancel_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Task) -> bool,
    {
        let before = self.queue.len();
        let kept: Vec<_> = self
            .queue
            .drain()
            .filter(|Reverse(s)| !predicate(&s.task))
            .collect();
        self.queue = kept.into_iter().collect();
        before - self.queue.len()
    }
}
