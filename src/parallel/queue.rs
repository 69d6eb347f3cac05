//! Shared queue of row indices handed out to workers.

use std::collections::VecDeque;

use parking_lot::Mutex;

/// A multi-producer, multi-consumer pool of row indices.
///
/// Every index pushed is returned by exactly one [`try_pop`](Self::try_pop)
/// call, whichever thread makes it. Pops are serialized by a mutex, so
/// delivery is linearizable: no index is handed out twice and none is lost.
/// Indices come out in insertion order, but with several consumers there is
/// no telling which consumer gets which.
#[derive(Debug, Default)]
pub struct RowWorkQueue {
    pending: Mutex<VecDeque<usize>>,
}

impl RowWorkQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue holding `0..rows`.
    pub fn seeded(rows: usize) -> Self {
        (0..rows).collect()
    }

    /// Appends `index` to the back of the queue.
    pub fn push(&self, index: usize) {
        self.pending.lock().push_back(index);
    }

    /// Removes and returns one index, or `None` once the queue is drained.
    pub fn try_pop(&self) -> Option<usize> {
        self.pending.lock().pop_front()
    }

    /// Number of indices not yet taken.
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// `true` once every index has been taken.
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl FromIterator<usize> for RowWorkQueue {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            pending: Mutex::new(iter.into_iter().collect()),
        }
    }
}
