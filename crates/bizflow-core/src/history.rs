//! Fixed-capacity, newest-first in-memory log.

use std::collections::VecDeque;

/// A bounded history: insertion at the front, eviction from the back once
/// capacity is exceeded.
///
/// Not synchronized; owners wrap it in a mutex.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    /// Creates an empty history retaining at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records an entry as the newest, evicting the oldest if full.
    pub fn record(&mut self, entry: T) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Iterates entries newest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded (or everything evicted).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> BoundedHistory<T> {
    /// Returns up to `limit` entries, newest first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<T> {
        self.entries.iter().take(limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_returns_newest_first() {
        let mut history = BoundedHistory::new(5);
        for i in 0..3 {
            history.record(i);
        }

        assert_eq!(history.recent(10), vec![2, 1, 0]);
    }

    #[test]
    fn test_oldest_entries_are_evicted_past_capacity() {
        // Arrange
        let mut history = BoundedHistory::new(100);

        // Act
        for i in 0..150 {
            history.record(i);
        }

        // Assert
        assert_eq!(history.len(), 100);
        let recent = history.recent(200);
        assert_eq!(recent.len(), 100);
        assert_eq!(recent[0], 149);
        assert_eq!(recent[99], 50);
    }

    #[test]
    fn test_recent_respects_limit() {
        let mut history = BoundedHistory::new(10);
        for i in 0..10 {
            history.record(i);
        }

        assert_eq!(history.recent(3), vec![9, 8, 7]);
    }

    #[test]
    fn test_zero_capacity_retains_nothing() {
        let mut history = BoundedHistory::new(0);
        history.record("dropped");

        assert!(history.is_empty());
        assert_eq!(history.capacity(), 0);
    }
}
