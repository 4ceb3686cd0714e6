//! Stratified, seeded train/holdout split.
//!
//! For each label class independently:
//! - shuffle the class's row indices with a seeded `StdRng`
//! - take `round(class_count × holdout_fraction)` rows (clamped to
//!   `[1, class_count - 1]`) as holdout, the rest as training
//!
//! so both partitions keep the overall positive/negative ratio and every class
//! with at least two rows appears on both sides. Output indices are sorted so
//! downstream iteration follows input order.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{LeadError, Result};

/// Row indices of each partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub holdout: Vec<usize>,
}

/// Split `labels` into stratified train/holdout index sets.
pub fn stratified_split(labels: &[bool], holdout_fraction: f64, seed: u64) -> Result<Split> {
    if !(holdout_fraction > 0.0 && holdout_fraction < 1.0) {
        return Err(LeadError::config(format!(
            "Holdout fraction must be in (0, 1), got {holdout_fraction}."
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(labels.len());
    let mut holdout = Vec::new();

    // Fixed class order (negatives first) keeps the RNG stream deterministic.
    for class in [false, true] {
        let mut idx: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == class)
            .map(|(i, _)| i)
            .collect();
        let count = idx.len();
        if count < 2 {
            return Err(LeadError::training(format!(
                "Need at least 2 rows with converted={}, found {count}.",
                u8::from(class)
            )));
        }

        idx.shuffle(&mut rng);
        let n_holdout = ((count as f64 * holdout_fraction).round() as usize).clamp(1, count - 1);
        holdout.extend_from_slice(&idx[..n_holdout]);
        train.extend_from_slice(&idx[n_holdout..]);
    }

    train.sort_unstable();
    holdout.sort_unstable();
    Ok(Split { train, holdout })
}
