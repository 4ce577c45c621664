//! Training History
//!
//! One record per processed training batch, across all epochs. The sequence
//! is append-only: entries are never mutated once written, and the reporter
//! is its only consumer.

use serde::{Deserialize, Serialize};

/// Loss and accuracy observed on a single training batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord {
    /// Cross-entropy loss on the batch
    pub loss: f64,
    /// Fraction of the batch predicted correctly
    pub accuracy: f64,
}

/// Append-only per-batch training history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingHistory {
    records: Vec<BatchRecord>,
}

impl TrainingHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the loss/accuracy sample of one batch
    pub fn record(&mut self, loss: f64, accuracy: f64) {
        self.records.push(BatchRecord { loss, accuracy });
    }

    /// Number of recorded batches
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in append order
    pub fn records(&self) -> &[BatchRecord] {
        &self.records
    }

    /// Loss series in append order
    pub fn losses(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.loss).collect()
    }

    /// Accuracy series in append order
    pub fn accuracies(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.accuracy).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_appends_in_order() {
        let mut history = TrainingHistory::new();
        assert!(history.is_empty());

        history.record(1.5, 0.25);
        history.record(1.2, 0.50);
        history.record(0.9, 0.75);

        assert_eq!(history.len(), 3);
        assert_eq!(history.losses(), vec![1.5, 1.2, 0.9]);
        assert_eq!(history.accuracies(), vec![0.25, 0.50, 0.75]);
    }

    #[test]
    fn test_existing_entries_unchanged_by_append() {
        let mut history = TrainingHistory::new();
        history.record(2.0, 0.1);

        let before = history.records()[0];
        history.record(1.0, 0.9);
        history.record(0.5, 1.0);

        assert_eq!(history.records()[0], before);
    }
}
