//! One-shot timer queue driven by the host's clock.
//!
//! The page runs on a single cooperative event loop, so timers do not fire on
//! their own: the host calls [`TimerQueue::advance`] and receives every task
//! that has come due, in due order. Tasks due at the same instant fire in the
//! order they were scheduled.

#[cfg(test)]
#[path = "timers_test.rs"]
mod timers_test;

use std::collections::BTreeMap;
use std::time::Duration;

use crate::dom::NodeId;

/// Work scheduled for later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Dismiss the alert banner.
    DismissAlert(NodeId),
}

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now: Duration,
    seq: u64,
    pending: BTreeMap<(Duration, u64), TimerTask>,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the queue was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` to fire `delay` from now.
    pub fn schedule(&mut self, delay: Duration, task: TimerTask) {
        let due = self.now.saturating_add(delay);
        self.pending.insert((due, self.seq), task);
        self.seq += 1;
    }

    /// Move the clock forward by `elapsed` and drain every task now due.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerTask> {
        self.now = self.now.saturating_add(elapsed);
        let later = self.pending.split_off(&(self.now, u64::MAX));
        std::mem::replace(&mut self.pending, later).into_values().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
