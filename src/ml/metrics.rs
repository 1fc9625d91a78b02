//! Evaluation metrics for classification models.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Confusion matrix for a `K`-class classifier.
pub struct ConfusionMatrix {
    /// Number of classes.
    pub n_classes: usize,
    /// Row-major `KxK` counts (`truth * K + predicted`).
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    /// Create an empty `KxK` confusion matrix.
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    pub fn add(&mut self, truth: usize, predicted: usize) {
        if truth >= self.n_classes || predicted >= self.n_classes {
            return;
        }
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Precision/recall statistics for a single class.
pub struct PerClassStats {
    /// `TP / (TP + FP)`.
    pub precision: f64,
    /// `TP / (TP + FN)`.
    pub recall: f64,
    /// Total number of true examples for the class.
    pub support: u32,
}

/// Compute per-class precision and recall from a confusion matrix.
pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<PerClassStats> {
    let k = cm.n_classes;
    (0..k)
        .map(|class_idx| {
            let tp = cm.get(class_idx, class_idx) as f64;
            let support: u32 = (0..k).map(|j| cm.get(class_idx, j)).sum();
            let fn_ = support as f64 - tp;
            let fp: f64 = (0..k)
                .filter(|&i| i != class_idx)
                .map(|i| cm.get(i, class_idx) as f64)
                .sum();
            PerClassStats {
                precision: if tp + fp == 0.0 { 0.0 } else { tp / (tp + fp) },
                recall: if tp + fn_ == 0.0 { 0.0 } else { tp / (tp + fn_) },
                support,
            }
        })
        .collect()
}

/// Screening view of a two-class matrix where class `1` is positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinarySummary {
    /// True-positive rate.
    pub sensitivity: f64,
    /// True-negative rate.
    pub specificity: f64,
    /// Harmonic mean of positive-class precision and recall.
    pub f1: f64,
}

/// Summarize a two-class matrix; `None` for any other class count.
pub fn binary_summary(cm: &ConfusionMatrix) -> Option<BinarySummary> {
    if cm.n_classes != 2 {
        return None;
    }
    let stats = precision_recall_by_class(cm);
    let (negative, positive) = (&stats[0], &stats[1]);
    let f1 = if positive.precision + positive.recall == 0.0 {
        0.0
    } else {
        2.0 * positive.precision * positive.recall / (positive.precision + positive.recall)
    };
    Some(BinarySummary {
        sensitivity: positive.recall,
        specificity: negative.recall,
        f1,
    })
}

/// Compute overall accuracy from a confusion matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> f64 {
    let total = cm.total();
    if total == 0 {
        return 0.0;
    }
    let correct: u64 = (0..cm.n_classes).map(|i| cm.get(i, i) as u64).sum();
    correct as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_matrix_statistics() {
        let mut cm = ConfusionMatrix::new(2);
        for (truth, predicted) in [(0, 0), (0, 0), (0, 1), (1, 1), (1, 1), (1, 1), (1, 0)] {
            cm.add(truth, predicted);
        }
        cm.add(2, 0);
        assert_eq!(cm.total(), 7);
        assert!((accuracy(&cm) - 5.0 / 7.0).abs() < 1e-12);
        let stats = precision_recall_by_class(&cm);
        assert_eq!(stats[1].support, 4);
        assert!((stats[1].precision - 0.75).abs() < 1e-12);
        assert!((stats[1].recall - 0.75).abs() < 1e-12);
        assert!((stats[0].precision - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn binary_summary_reads_positive_class() {
        let mut cm = ConfusionMatrix::new(2);
        for (truth, predicted) in [(0, 0), (0, 0), (0, 0), (0, 1), (1, 1), (1, 0)] {
            cm.add(truth, predicted);
        }
        let summary = binary_summary(&cm).unwrap();
        assert!((summary.sensitivity - 0.5).abs() < 1e-12);
        assert!((summary.specificity - 0.75).abs() < 1e-12);
        assert!((summary.f1 - 0.5).abs() < 1e-12);
        assert!(binary_summary(&ConfusionMatrix::new(3)).is_none());
    }

    #[test]
    fn empty_matrix_has_zero_accuracy() {
        assert_eq!(accuracy(&ConfusionMatrix::new(2)), 0.0);
    }
}
