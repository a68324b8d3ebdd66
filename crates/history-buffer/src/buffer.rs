//! Multi-Feature History Buffer

use crate::ring::WindowRing;
use crate::SlotStats;

/// History for every feature slot of an extraction plan.
///
/// Slots are addressed by their position in the plan; every slot receives
/// exactly one push per window so lags line up across slots.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    rings: Vec<WindowRing>,
}

impl HistoryBuffer {
    /// Create a buffer where slot `i` keeps `depths[i]` windows of history
    /// in addition to the current window.
    pub fn new(depths: &[usize]) -> Self {
        Self {
            rings: depths.iter().map(|&d| WindowRing::new(d + 1)).collect(),
        }
    }

    /// Record the value of `slot` for the current window
    pub fn push(&mut self, slot: usize, value: Option<Vec<f64>>) {
        if let Some(ring) = self.rings.get_mut(slot) {
            ring.push(value);
        }
    }

    /// Value of `slot` from `lag` windows ago (0 = current window)
    pub fn get(&self, slot: usize, lag: usize) -> Option<&[f64]> {
        self.rings.get(slot).and_then(|ring| ring.get(lag))
    }

    /// Number of slots
    pub fn slots(&self) -> usize {
        self.rings.len()
    }

    /// Occupancy of one slot
    pub fn stats(&self, slot: usize) -> Option<SlotStats> {
        self.rings.get(slot).map(WindowRing::stats)
    }

    /// Total windows retained across all slots
    pub fn retained_windows(&self) -> usize {
        self.rings.iter().map(WindowRing::len).sum()
    }

    /// Clear all slots
    pub fn clear(&mut self) {
        self.rings.iter_mut().for_each(WindowRing::clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_independent() {
        let mut buffer = HistoryBuffer::new(&[0, 3]);
        for w in 0..6 {
            buffer.push(0, Some(vec![w as f64]));
            buffer.push(1, Some(vec![10.0 * w as f64]));
        }

        assert_eq!(buffer.get(0, 0), Some(&[5.0][..]));
        assert_eq!(buffer.get(0, 1), None);
        assert_eq!(buffer.get(1, 3), Some(&[20.0][..]));
        assert_eq!(buffer.get(1, 4), None);
        assert_eq!(buffer.retained_windows(), 1 + 4);
    }

    #[test]
    fn test_stats_and_clear() {
        let mut buffer = HistoryBuffer::new(&[2]);
        buffer.push(0, None);
        buffer.push(0, Some(vec![1.0]));
        assert_eq!(
            buffer.stats(0),
            Some(SlotStats {
                retained: 2,
                capacity: 3,
                total_written: 2
            })
        );
        buffer.clear();
        assert_eq!(buffer.retained_windows(), 0);
        assert_eq!(buffer.get(5, 0), None);
        assert_eq!(buffer.slots(), 1);
    }
}
