//! Holdout evaluation: ROC AUC and a thresholded classification report.

use serde::{Deserialize, Serialize};

/// Area under the ROC curve via the Mann–Whitney U statistic.
///
/// Tied scores receive their average rank, which matches the trapezoidal ROC
/// area. Returns `None` when either class is absent (AUC is undefined).
pub fn roc_auc(labels: &[bool], scores: &[f64]) -> Option<f64> {
    debug_assert_eq!(labels.len(), scores.len());
    let n_pos = labels.iter().filter(|&&l| l).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // Sum of 1-based midranks of the positives.
    let mut rank_sum_pos = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && scores[order[end + 1]] == scores[order[start]] {
            end += 1;
        }
        let midrank = (start + end) as f64 / 2.0 + 1.0;
        for &i in &order[start..=end] {
            if labels[i] {
                rank_sum_pos += midrank;
            }
        }
        start = end + 1;
    }

    let n_pos_f = n_pos as f64;
    let u = rank_sum_pos - n_pos_f * (n_pos_f + 1.0) / 2.0;
    Some(u / (n_pos_f * n_neg as f64))
}

/// Precision/recall/F1 for one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Classification report at a fixed probability threshold.
///
/// Undefined ratios (0/0) are reported as 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub threshold: f64,
    /// Metrics for `converted = 0`.
    pub negative: ClassMetrics,
    /// Metrics for `converted = 1`.
    pub positive: ClassMetrics,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    /// Build a report by thresholding `scores` (`score > threshold` predicts positive).
    pub fn from_scores(labels: &[bool], scores: &[f64], threshold: f64) -> Self {
        debug_assert_eq!(labels.len(), scores.len());
        let (mut tp, mut fp, mut tn, mut fn_) = (0usize, 0usize, 0usize, 0usize);
        for (&y, &s) in labels.iter().zip(scores) {
            match (y, s > threshold) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (false, false) => tn += 1,
                (true, false) => fn_ += 1,
            }
        }

        let positive = class_metrics(tp, fp, fn_);
        let negative = class_metrics(tn, fn_, fp);
        let total = labels.len();

        let macro_avg = ClassMetrics {
            precision: (positive.precision + negative.precision) / 2.0,
            recall: (positive.recall + negative.recall) / 2.0,
            f1: (positive.f1 + negative.f1) / 2.0,
            support: total,
        };
        let weighted = |f: fn(&ClassMetrics) -> f64| {
            ratio(
                f(&positive) * positive.support as f64 + f(&negative) * negative.support as f64,
                total as f64,
            )
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1: weighted(|m| m.f1),
            support: total,
        };

        Self {
            threshold,
            negative,
            positive,
            accuracy: ratio((tp + tn) as f64, total as f64),
            macro_avg,
            weighted_avg,
        }
    }
}

fn class_metrics(tp: usize, fp: usize, fn_: usize) -> ClassMetrics {
    let precision = ratio(tp as f64, (tp + fp) as f64);
    let recall = ratio(tp as f64, (tp + fn_) as f64);
    ClassMetrics {
        precision,
        recall,
        f1: ratio(2.0 * precision * recall, precision + recall),
        support: tp + fn_,
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auc_perfect_and_inverted() {
        let y = [false, false, true, true];
        assert_eq!(roc_auc(&y, &[0.1, 0.2, 0.8, 0.9]), Some(1.0));
        assert_eq!(roc_auc(&y, &[0.9, 0.8, 0.2, 0.1]), Some(0.0));
    }

    #[test]
    fn auc_with_ties_is_half_credit() {
        let y = [false, true];
        assert_eq!(roc_auc(&y, &[0.5, 0.5]), Some(0.5));

        // One positive ranked above both negatives, one tied with a negative.
        let y = [false, false, true, true];
        let auc = roc_auc(&y, &[0.1, 0.6, 0.6, 0.9]).unwrap();
        assert!((auc - 0.875).abs() < 1e-12);
    }

    #[test]
    fn auc_undefined_for_single_class() {
        assert_eq!(roc_auc(&[true, true], &[0.1, 0.2]), None);
    }

    #[test]
    fn report_counts() {
        let y = [true, true, true, false, false];
        let s = [0.9, 0.7, 0.2, 0.6, 0.1];
        let r = ClassificationReport::from_scores(&y, &s, 0.5);

        // tp=2 fp=1 tn=1 fn=1
        assert!((r.positive.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((r.positive.recall - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(r.positive.support, 3);
        assert!((r.negative.precision - 0.5).abs() < 1e-12);
        assert!((r.negative.recall - 0.5).abs() < 1e-12);
        assert_eq!(r.negative.support, 2);
        assert!((r.accuracy - 0.6).abs() < 1e-12);
        assert_eq!(r.macro_avg.support, 5);
    }

    #[test]
    fn report_handles_no_positive_predictions() {
        let r = ClassificationReport::from_scores(&[true, false], &[0.1, 0.2], 0.5);
        assert_eq!(r.positive.precision, 0.0);
        assert_eq!(r.positive.f1, 0.0);
        assert_eq!(r.negative.recall, 1.0);
    }
}
