//! Reporting utilities: priority distribution and formatted terminal output.

use crate::domain::{Priority, RankedLeadSet};

pub mod format;

pub use format::*;

/// Lead count for one tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityBucket {
    pub priority: Priority,
    pub count: usize,
    /// Fraction of the batch in this tier (0 for an empty batch).
    pub share: f64,
}

/// Counts per tier, ordered "Very High" → "Very Low". Empty tiers are included.
pub fn priority_distribution(ranked: &RankedLeadSet) -> Vec<PriorityBucket> {
    let total = ranked.len();
    ranked
        .priority_counts()
        .into_iter()
        .map(|(priority, count)| PriorityBucket {
            priority,
            count,
            share: if total == 0 { 0.0 } else { count as f64 / total as f64 },
        })
        .collect()
}
