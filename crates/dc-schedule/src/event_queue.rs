//! `EventQueue` — timed callbacks keyed by simulation tick.
//!
//! `BTreeMap` gives O(log W) push and pop where W is the number of distinct
//! future ticks with pending events.  Warehouse events cluster on a handful
//! of cadences (order timer, truck arrivals, gate ticks) plus in-flight
//! moves, so W stays small.

use std::collections::BTreeMap;

use dc_core::Tick;

/// A priority queue mapping ticks → events due at that tick.
///
/// Events pushed for the same tick are returned in push order.
pub struct EventQueue<E> {
    inner: BTreeMap<Tick, Vec<E>>,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self { inner: BTreeMap::new(), total: 0 }
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` at `tick`.
    pub fn push(&mut self, tick: Tick, event: E) {
        self.inner.entry(tick).or_default().push(event);
        self.total += 1;
    }

    /// Remove and return all events scheduled for exactly `tick`.
    ///
    /// Returns `None` if nothing is due (avoids allocation on quiet ticks).
    pub fn drain_tick(&mut self, tick: Tick) -> Option<Vec<E>> {
        let events = self.inner.remove(&tick)?;
        self.total -= events.len();
        Some(events)
    }

    /// The earliest tick with at least one event, or `None` if empty.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    /// Iterate pending events in due order without removing them.
    pub fn iter(&self) -> impl Iterator<Item = (Tick, &E)> {
        self.inner.iter().flat_map(|(&t, v)| v.iter().map(move |e| (t, e)))
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct future ticks with at least one event.
    pub fn tick_count(&self) -> usize {
        self.inner.len()
    }
}
