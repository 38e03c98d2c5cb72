//! One-shot timers on the page clock.
//!
//! Deadlines are offsets from the page's start. The queue never reads a clock
//! itself: the page advances time and collects whatever became due.

use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle for one scheduled timer.
    pub struct TimerId;
}

#[derive(Debug)]
struct Entry<T> {
    deadline: Duration,
    seq: u64,
    payload: T,
}

/// Pending one-shot timers carrying a payload of type `T`.
#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: SlotMap<TimerId, Entry<T>>,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    /// Schedule `payload` to become due at `deadline`.
    pub fn schedule(&mut self, deadline: Duration, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(Entry {
            deadline,
            seq,
            payload,
        })
    }

    /// Cancel a timer, returning its payload if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.entries.remove(id).map(|entry| entry.payload)
    }

    /// The earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.values().map(|entry| entry.deadline).min()
    }

    /// Remove and return every timer due at `now`, earliest first.
    ///
    /// Timers sharing a deadline come out in scheduling order.
    pub fn take_due(&mut self, now: Duration) -> Vec<(TimerId, T)> {
        let mut due: Vec<(Duration, u64, TimerId)> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.deadline <= now)
            .map(|(id, entry)| (entry.deadline, entry.seq, id))
            .collect();
        due.sort();
        due.into_iter()
            .filter_map(|(_, _, id)| self.entries.remove(id).map(|entry| (id, entry.payload)))
            .collect()
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
