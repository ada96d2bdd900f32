//! Deadline table keyed by slot.
//!
//! Arming a slot that is already armed replaces its deadline, so a slot never
//! carries more than one pending expiry.

use std::collections::BTreeMap;
use std::time::Instant;

/// Caller-driven timer table.
#[derive(Debug, Clone)]
pub struct Timers<K: Ord + Clone> {
    deadlines: BTreeMap<K, Instant>,
}

impl<K: Ord + Clone> Default for Timers<K> {
    fn default() -> Self {
        Self {
            deadlines: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> Timers<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `slot` for `deadline`, cancelling any earlier deadline.
    pub fn schedule(&mut self, slot: K, deadline: Instant) {
        self.deadlines.insert(slot, deadline);
    }

    /// Disarms `slot`. Returns whether it was armed.
    pub fn cancel(&mut self, slot: &K) -> bool {
        self.deadlines.remove(slot).is_some()
    }

    pub fn is_armed(&self, slot: &K) -> bool {
        self.deadlines.contains_key(slot)
    }

    pub fn deadline(&self, slot: &K) -> Option<Instant> {
        self.deadlines.get(slot).copied()
    }

    /// Earliest pending deadline, for callers that sleep until the next tick.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    /// Moves a pending deadline to another slot key.
    pub fn rekey(&mut self, old_slot: &K, new_slot: K) {
        if let Some(deadline) = self.deadlines.remove(old_slot) {
            self.deadlines.insert(new_slot, deadline);
        }
    }

    /// Disarms and returns every slot whose deadline is at or before `now`.
    pub fn due(&mut self, now: Instant) -> Vec<K> {
        let fired: Vec<K> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(slot, _)| slot.clone())
            .collect();
        for slot in &fired {
            self.deadlines.remove(slot);
        }
        fired
    }
}
