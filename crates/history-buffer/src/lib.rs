//! Window History Buffer
//!
//! Keeps the most recent computed values of every feature slot so that
//! dependencies at a past offset can be served without recomputation.
//! Each slot retains `depth + 1` windows: the current one plus `depth`
//! windows of history.

mod buffer;
mod ring;

pub use buffer::HistoryBuffer;

/// Occupancy snapshot of a single slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotStats {
    /// Windows currently retained
    pub retained: usize,
    /// Maximum windows the slot can retain
    pub capacity: usize,
    /// Total windows ever written
    pub total_written: usize,
}
