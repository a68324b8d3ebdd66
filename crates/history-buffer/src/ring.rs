//! Fixed-Capacity Window Ring

use crate::SlotStats;
use std::collections::VecDeque;

/// Ring of per-window values for one feature; the oldest window is evicted
/// once capacity is reached.
#[derive(Debug, Clone)]
pub struct WindowRing {
    /// Retained windows, oldest first
    entries: VecDeque<Option<Vec<f64>>>,
    /// Capacity of the ring (at least 1)
    capacity: usize,
    /// Windows pushed so far
    total_written: usize,
}

impl WindowRing {
    /// Create a ring retaining `capacity` windows (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            total_written: 0,
        }
    }

    /// Append the next window's value, evicting the oldest window when
    /// the ring is full. `None` marks a window without a value.
    pub fn push(&mut self, value: Option<Vec<f64>>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(value);
        self.total_written += 1;
    }

    /// Value `lag` windows before the most recent one.
    ///
    /// `None` when the window is older than the retained history, has not
    /// been reached yet, or carried no value.
    pub fn get(&self, lag: usize) -> Option<&[f64]> {
        let len = self.entries.len();
        if lag >= len {
            return None;
        }
        self.entries[len - 1 - lag].as_deref()
    }

    /// Number of windows currently retained
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Occupancy snapshot
    pub fn stats(&self) -> SlotStats {
        SlotStats {
            retained: self.entries.len(),
            capacity: self.capacity,
            total_written: self.total_written,
        }
    }

    /// Drop every retained window and reset the write count
    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_written = 0;
    }
}
