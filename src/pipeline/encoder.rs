//! Column transform: one-hot categorical blocks followed by numeric passthrough.
//!
//! Layout of an encoded row (width = Σ categories + 4):
//!
//! ```text
//! [ industry one-hot | lead_source one-hot | region one-hot | employees, pages_visited, emails_opened, last_contact_days ]
//! ```
//!
//! Category vocabularies are frozen at fit time (sorted, deduplicated). A value
//! that was never seen during fitting encodes as an all-zero block.

use std::collections::BTreeSet;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::domain::{CATEGORICAL_FEATURES, LeadFeatures, NUMERIC_FEATURES};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEncoder {
    /// Sorted vocabulary per categorical column, in `CATEGORICAL_FEATURES` order.
    categories: Vec<Vec<String>>,
}

impl FeatureEncoder {
    /// Learn category vocabularies from training rows.
    pub fn fit(rows: &[&LeadFeatures]) -> Self {
        let mut vocab: Vec<BTreeSet<String>> = vec![BTreeSet::new(); CATEGORICAL_FEATURES.len()];
        for row in rows {
            for (set, value) in vocab.iter_mut().zip(row.categorical()) {
                set.insert(value.to_string());
            }
        }
        Self {
            categories: vocab.into_iter().map(|s| s.into_iter().collect()).collect(),
        }
    }

    /// Encoded row width.
    pub fn width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum::<usize>() + NUMERIC_FEATURES.len()
    }

    /// Vocabulary of a categorical column (by position in `CATEGORICAL_FEATURES`).
    pub fn categories(&self, column: usize) -> &[String] {
        &self.categories[column]
    }

    /// Human-readable names for each encoded column.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.width());
        for (col, vocab) in CATEGORICAL_FEATURES.iter().zip(&self.categories) {
            names.extend(vocab.iter().map(|v| format!("{col}={v}")));
        }
        names.extend(NUMERIC_FEATURES.iter().map(|s| s.to_string()));
        names
    }

    /// Encode one row into `out`.
    ///
    /// Returns how many categorical values were not in the vocabulary.
    ///
    /// # Panics
    /// Panics if `out.len() != self.width()`.
    pub fn encode_into(&self, row: &LeadFeatures, out: &mut [f64]) -> usize {
        assert_eq!(out.len(), self.width(), "encoded row has the wrong width");
        out.fill(0.0);

        let mut offset = 0;
        let mut unseen = 0;
        for (vocab, value) in self.categories.iter().zip(row.categorical()) {
            match vocab.binary_search_by(|c| c.as_str().cmp(value)) {
                Ok(pos) => out[offset + pos] = 1.0,
                Err(_) => unseen += 1,
            }
            offset += vocab.len();
        }
        for (slot, value) in out[offset..].iter_mut().zip(row.numeric()) {
            *slot = value;
        }
        unseen
    }

    /// Encode one row into a fresh vector.
    pub fn encode(&self, row: &LeadFeatures) -> Vec<f64> {
        let mut out = vec![0.0; self.width()];
        self.encode_into(row, &mut out);
        out
    }

    /// Encode a batch into a dense design matrix (one row per lead).
    pub fn transform(&self, rows: &[&LeadFeatures]) -> DMatrix<f64> {
        let width = self.width();
        let mut buf = vec![0.0; width];
        let mut x = DMatrix::zeros(rows.len(), width);
        for (i, row) in rows.iter().enumerate() {
            self.encode_into(row, &mut buf);
            for (j, v) in buf.iter().enumerate() {
                x[(i, j)] = *v;
            }
        }
        x
    }
}
