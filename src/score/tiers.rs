//! Rank-based priority tiers.
//!
//! Tiers are assigned by position within the scored batch, not by fixed score
//! thresholds. For a batch of `n` leads, each lead's ascending 0-based position
//! `r` maps to tier `floor((2r + 1) · 5 / 2n)`: the centre of each position is
//! placed on a five-way split of `[0, n)`.
//!
//! Ties: leads with identical scores form a group and share the group's
//! midrank, so `2r + 1` becomes `first + last + 1` over the group's positions.
//! Identical scores therefore always land in the same tier and tiers never
//! decrease as the score increases.
//!
//! Consequences:
//! - `n` divisible by 5 with distinct scores: five equal bins
//! - other `n`: bin sizes differ by at most one, symmetric around "Medium"
//! - `n < 5`: fewer tiers, spread over the scale (1 lead → "Medium")
//! - all scores equal: every lead is "Medium"

use crate::domain::Priority;

const TIERS: usize = 5;

/// Assign tiers to scores already sorted in descending order.
pub fn assign_priorities(sorted_desc: &[f64]) -> Vec<Priority> {
    let n = sorted_desc.len();
    let mut out = vec![Priority::Medium; n];

    let mut start = 0;
    while start < n {
        let mut end = start;
        while end + 1 < n && sorted_desc[end + 1] == sorted_desc[start] {
            end += 1;
        }

        // Descending positions start..=end are ascending positions n-1-end..=n-1-start.
        let first = n - 1 - end;
        let last = n - 1 - start;
        let tier = Priority::from_index((first + last + 1) * TIERS / (2 * n));
        out[start..=end].fill(tier);

        start = end + 1;
    }

    out
}
