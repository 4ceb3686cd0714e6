//! Transform-then-classify pipeline.
//!
//! `build_pipeline` returns an unfitted [`LeadPipeline`]; fitting it on labeled
//! features yields an immutable [`FittedPipeline`] (encoder + classifier) that is
//! persisted by the trainer and loaded by the scorer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::LeadFeatures;
use crate::error::{LeadError, Result};

pub mod classifier;
pub mod encoder;

pub use classifier::{LogisticConfig, LogisticModel, fit_logistic};
pub use encoder::FeatureEncoder;

/// Unfitted pipeline: the classifier settings plus the fixed column transform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LeadPipeline {
    pub classifier: LogisticConfig,
}

/// Construct the standard pipeline with the given iteration budget.
pub fn build_pipeline(max_iter: usize) -> LeadPipeline {
    LeadPipeline {
        classifier: LogisticConfig {
            max_iter,
            ..LogisticConfig::default()
        },
    }
}

impl LeadPipeline {
    /// Fit the encoder vocabulary and the classifier on the same rows.
    pub fn fit(&self, rows: &[&LeadFeatures], labels: &[bool]) -> Result<FittedPipeline> {
        if rows.len() != labels.len() {
            return Err(LeadError::training(format!(
                "{} feature rows but {} labels.",
                rows.len(),
                labels.len()
            )));
        }
        for (i, row) in rows.iter().enumerate() {
            row.validate()
                .map_err(|e| LeadError::schema(format!("training row {}: {e}", i + 1)))?;
        }

        let encoder = FeatureEncoder::fit(rows);
        let x = encoder.transform(rows);
        debug!(rows = x.nrows(), width = x.ncols(), "encoded training matrix");

        let model = fit_logistic(&x, labels, &self.classifier)?;
        Ok(FittedPipeline { encoder, model })
    }
}

/// A fitted transform + classifier pair. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPipeline {
    pub encoder: FeatureEncoder,
    pub model: LogisticModel,
}

impl FittedPipeline {
    /// Conversion probability for one lead.
    ///
    /// Unseen categories contribute nothing (all-zero block); this never fails.
    pub fn predict_proba(&self, row: &LeadFeatures) -> f64 {
        let encoded = self.encoder.encode(row);
        self.model.predict_proba(&encoded)
    }

    /// Encoded column names paired with their fitted coefficients.
    pub fn coefficients(&self) -> Vec<(String, f64)> {
        self.encoder
            .feature_names()
            .into_iter()
            .zip(self.model.coefficients.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(source: &str, pages: f64) -> LeadFeatures {
        LeadFeatures {
            industry: "SaaS".to_string(),
            lead_source: source.to_string(),
            region: "EU".to_string(),
            employees: 50.0,
            pages_visited: pages,
            emails_opened: 2.0,
            last_contact_days: 5.0,
        }
    }

    #[test]
    fn fit_then_predict_including_unseen_category() {
        let rows = vec![
            lead("Ads", 1.0),
            lead("Ads", 2.0),
            lead("Referral", 9.0),
            lead("Referral", 8.0),
            lead("Ads", 7.0),
            lead("Referral", 3.0),
        ];
        let labels = [false, false, true, true, true, false];
        let refs: Vec<&LeadFeatures> = rows.iter().collect();

        let fitted = build_pipeline(200).fit(&refs, &labels).unwrap();
        assert_eq!(fitted.coefficients().len(), fitted.encoder.width());

        let p_hi = fitted.predict_proba(&lead("Referral", 9.0));
        let p_lo = fitted.predict_proba(&lead("Ads", 1.0));
        assert!(p_hi > p_lo);

        let p_unseen = fitted.predict_proba(&lead("Billboard", 5.0));
        assert!((0.0..=1.0).contains(&p_unseen));
    }

    #[test]
    fn invalid_training_row_is_a_schema_error() {
        let mut bad = lead("Ads", 1.0);
        bad.employees = -5.0;
        let good = lead("Ads", 2.0);
        let err = build_pipeline(200).fit(&[&good, &bad], &[false, true]).unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("training row 2"));
    }
}
