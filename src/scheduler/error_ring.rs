//! Bounded ring of recent errors, feeding the live-state snapshot.
//!
//! Grounded on the teacher's `VecDeque`-backed, `MAX_SAMPLES`-capped ring
//! in `runtime/governor/latency.rs:51,53,80-81`; capacity fixed at 20 per
//! spec.md §7.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

const CAPACITY: usize = 20;

#[derive(Debug, Clone)]
pub struct ErrorEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

/// A fixed-capacity FIFO of recent error messages; pushing past capacity
/// drops the oldest entry.
#[derive(Debug, Default)]
pub struct ErrorRing {
    entries: VecDeque<ErrorEntry>,
}

impl ErrorRing {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(CAPACITY),
        }
    }

    pub fn push(&mut self, at: DateTime<Utc>, message: impl Into<String>) {
        if self.entries.len() == CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(ErrorEntry {
            at,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn entries(&self) -> impl Iterator<Item = &ErrorEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_oldest_entry_past_capacity() {
        let mut ring = ErrorRing::new();
        for i in 0..25 {
            ring.push(Utc::now(), format!("error {i}"));
        }
        assert_eq!(ring.len(), 20);
        let first = ring.entries().next().unwrap();
        assert_eq!(first.message, "error 5");
    }
}
