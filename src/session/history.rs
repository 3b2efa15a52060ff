//! Append-only prediction history for one interactive session.
//!
//! History is kept in memory only and dropped with the session. Retention is a
//! capped ring buffer: once `capacity` results are stored, each append evicts
//! the oldest one.

use std::collections::VecDeque;

use tracing::debug;

use crate::domain::PredictionResult;

/// Default number of results kept per session.
pub const DEFAULT_HISTORY_CAPACITY: usize = 500;

#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: VecDeque<PredictionResult>,
    capacity: usize,
    total: usize,
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl SessionHistory {
    /// A capacity of 0 is treated as 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
            total: 0,
        }
    }

    pub fn append(&mut self, result: PredictionResult) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            debug!(capacity = self.capacity, "history full, evicted oldest result");
        }
        self.entries.push_back(result);
        self.total += 1;
    }

    /// Retained results, oldest first.
    pub fn all(&self) -> Vec<PredictionResult> {
        self.entries.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = PredictionResult> + '_ {
        self.entries.iter().copied()
    }

    pub fn last(&self) -> Option<PredictionResult> {
        self.entries.back().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Every append over the session's lifetime, evicted ones included.
    pub fn total_recorded(&self) -> usize {
        self.total
    }

    /// `(sequence number, cost)` pairs for charting; numbering starts at 1 and
    /// keeps counting across evictions.
    pub fn series(&self) -> Vec<(f64, f64)> {
        let first = self.total - self.entries.len() + 1;
        self.entries
            .iter()
            .enumerate()
            .map(|(i, r)| ((first + i) as f64, r.value()))
            .collect()
    }
}
