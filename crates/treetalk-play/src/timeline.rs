//! Virtual clock with cancellable scheduled steps.
//!
//! Steps are queued with a due time and stamped with the epoch that was
//! current when they were scheduled. [`Timeline::cancel_all`] bumps the
//! epoch and empties the queue; a step from an older epoch is never
//! returned.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

use tracing::trace;

#[derive(Debug)]
struct Entry<S> {
    due: Duration,
    seq: u64,
    epoch: u64,
    step: S,
}

impl<S> PartialEq for Entry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<S> Eq for Entry<S> {}

impl<S> PartialOrd for Entry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for Entry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Cooperative scheduler driven by the host through [`Timeline::pop_due`].
#[derive(Debug)]
pub struct Timeline<S> {
    now: Duration,
    epoch: u64,
    seq: u64,
    queue: BinaryHeap<Reverse<Entry<S>>>,
}

impl<S> Default for Timeline<S> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            epoch: 0,
            seq: 0,
            queue: BinaryHeap::new(),
        }
    }
}

impl<S: std::fmt::Debug> Timeline<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of queued steps.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queue `step` to fire `delay` after the current time. Steps due at the
    /// same instant fire in scheduling order.
    pub fn schedule(&mut self, delay: Duration, step: S) -> Duration {
        let due = self.now.saturating_add(delay);
        trace!(?step, ?due, epoch = self.epoch, "step scheduled");
        self.queue.push(Reverse(Entry {
            due,
            seq: self.seq,
            epoch: self.epoch,
            step,
        }));
        self.seq += 1;
        due
    }

    /// Drop every queued step and start a new epoch. Returns how many steps
    /// were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        self.epoch += 1;
        if dropped > 0 {
            trace!(dropped, epoch = self.epoch, "steps cancelled");
        }
        dropped
    }

    /// Pop the earliest step due at or before `until`, moving the clock to
    /// its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<S> {
        loop {
            let due = self.queue.peek()?.0.due;
            if due > until {
                return None;
            }
            let Reverse(entry) = self.queue.pop()?;
            if entry.epoch != self.epoch {
                continue;
            }
            self.now = self.now.max(entry.due);
            return Some(entry.step);
        }
    }

    /// Move the clock forward to `until` without firing anything.
    pub fn set_now(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
