//! `WaitQueue` — entities parked until a gate releases them.

use std::collections::VecDeque;

/// An insertion-ordered set of blocked entities.
///
/// An entity appears at most once.  Releases never reorder the remaining
/// entries.
#[derive(Clone, Debug)]
pub struct WaitQueue<T> {
    entries: VecDeque<T>,
}

impl<T> Default for WaitQueue<T> {
    fn default() -> Self {
        Self { entries: VecDeque::new() }
    }
}

impl<T: Copy + PartialEq> WaitQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `item` at the back.  Returns `false` if it is already waiting.
    pub fn enter(&mut self, item: T) -> bool {
        if self.entries.contains(&item) {
            return false;
        }
        self.entries.push_back(item);
        true
    }

    /// Release a specific entity.
    pub fn free(&mut self, item: T) -> bool {
        match self.entries.iter().position(|&e| e == item) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    /// Evaluate `pred` once per entry in queue order, then release every
    /// entry it accepted.  Returns the released entries in queue order.
    ///
    /// `pred` may have side effects (e.g. claiming a cell for the entry),
    /// and sees earlier entries' effects within the same pass.
    pub fn release_where<F>(&mut self, mut pred: F) -> Vec<T>
    where
        F: FnMut(T) -> bool,
    {
        let released: Vec<T> = self.entries.iter().copied().filter(|&e| pred(e)).collect();
        for &item in &released {
            self.free(item);
        }
        released
    }

    pub fn front(&self) -> Option<T> {
        self.entries.front().copied()
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.entries.pop_front()
    }

    pub fn contains(&self, item: T) -> bool {
        self.entries.contains(&item)
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
