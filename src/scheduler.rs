//! Time-ordered event queue for pin evaluations
//!
//! At most one pending run is kept per pin. Rescheduling earlier pushes a
//! new heap entry and leaves the old one behind; stale entries are skipped
//! lazily when they surface.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::facility::Timestamp;
use crate::models::PinId;

#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<(Timestamp, PinId)>>,
    pending: HashMap<PinId, Timestamp>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `pin` at `time` unless it already has an equal or earlier
    /// pending run. Returns whether the queue changed.
    pub fn schedule(&mut self, pin: PinId, time: Timestamp) -> bool {
        if let Some(existing) = self.pending.get(&pin) {
            if *existing <= time {
                return false;
            }
        }
        self.pending.insert(pin, time);
        self.heap.push(Reverse((time, pin)));
        true
    }

    #[cfg(test)]
    pub fn scheduled_time(&self, pin: PinId) -> Option<Timestamp> {
        self.pending.get(&pin).copied()
    }

    fn discard_stale(&mut self) {
        while let Some(Reverse((time, pin))) = self.heap.peek() {
            if self.pending.get(pin) == Some(time) {
                break;
            }
            self.heap.pop();
        }
    }

    /// Earliest live event, left in the queue
    pub fn peek(&mut self) -> Option<(Timestamp, PinId)> {
        self.discard_stale();
        self.heap.peek().map(|Reverse(entry)| *entry)
    }

    pub fn pop(&mut self) -> Option<(Timestamp, PinId)> {
        self.discard_stale();
        let Reverse((time, pin)) = self.heap.pop()?;
        self.pending.remove(&pin);
        Some((time, pin))
    }

    /// Number of pins with a pending run
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
