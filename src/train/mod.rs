//! Training: stratified split → fit → holdout evaluation → persist.
//!
//! Evaluation numbers are reported, never enforced; a weak model is still
//! returned (and persisted) so a human can decide whether to deploy it.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{LABEL_COLUMN, LeadFeatures, LeadRecord};
use crate::error::{LeadError, Result};
use crate::io::artifact::{ModelArtifact, save_artifact};
use crate::pipeline::{FittedPipeline, build_pipeline};

pub mod metrics;
pub mod split;

pub use metrics::{ClassMetrics, ClassificationReport, roc_auc};
pub use split::{Split, stratified_split};

/// Training settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    pub seed: u64,
    pub holdout_fraction: f64,
    pub max_iter: usize,
    /// Probability threshold for the classification report.
    pub threshold: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            holdout_fraction: 0.25,
            max_iter: 200,
            threshold: 0.5,
        }
    }
}

/// Holdout evaluation and fit diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub trained_at: DateTime<Utc>,
    pub rows: usize,
    pub train_rows: usize,
    pub holdout_rows: usize,
    pub positive_rate: f64,
    /// `None` when the holdout lacks one of the classes.
    pub auc: Option<f64>,
    pub classification: ClassificationReport,
    pub converged: bool,
    pub iterations: usize,
    pub coefficients: Vec<(String, f64)>,
    pub intercept: f64,
}

/// Output of a training run: the fitted pipeline and its evaluation.
#[derive(Debug, Clone)]
pub struct TrainingRun {
    pub pipeline: FittedPipeline,
    pub report: TrainingReport,
}

impl TrainingRun {
    /// Wrap the fitted pipeline for persistence.
    pub fn artifact(&self) -> ModelArtifact {
        ModelArtifact {
            trained_at: self.report.trained_at,
            pipeline: self.pipeline.clone(),
        }
    }
}

/// Fit the pipeline on labeled records and evaluate it on a stratified holdout.
pub fn train(records: &[LeadRecord], config: &TrainConfig) -> Result<TrainingRun> {
    let labels = collect_labels(records)?;
    for (i, rec) in records.iter().enumerate() {
        rec.features
            .validate()
            .map_err(|e| LeadError::schema(format!("record {}: {e}", i + 1)))?;
    }

    let split = stratified_split(&labels, config.holdout_fraction, config.seed)?;
    let train_rows: Vec<&LeadFeatures> = split.train.iter().map(|&i| &records[i].features).collect();
    let train_labels: Vec<bool> = split.train.iter().map(|&i| labels[i]).collect();
    let pipeline = build_pipeline(config.max_iter).fit(&train_rows, &train_labels)?;

    let holdout_labels: Vec<bool> = split.holdout.iter().map(|&i| labels[i]).collect();
    let holdout_scores: Vec<f64> = split
        .holdout
        .iter()
        .map(|&i| pipeline.predict_proba(&records[i].features))
        .collect();

    let auc = roc_auc(&holdout_labels, &holdout_scores);
    let classification = ClassificationReport::from_scores(&holdout_labels, &holdout_scores, config.threshold);

    match auc {
        Some(auc) => info!(
            auc = %format!("{auc:.3}"),
            accuracy = %format!("{:.3}", classification.accuracy),
            train = split.train.len(),
            holdout = split.holdout.len(),
            "training complete"
        ),
        None => warn!("holdout is missing a class; AUC undefined"),
    }

    let positives = labels.iter().filter(|&&l| l).count();
    let report = TrainingReport {
        trained_at: Utc::now(),
        rows: records.len(),
        train_rows: split.train.len(),
        holdout_rows: split.holdout.len(),
        positive_rate: positives as f64 / labels.len() as f64,
        auc,
        classification,
        converged: pipeline.model.converged,
        iterations: pipeline.model.iterations,
        coefficients: pipeline.coefficients(),
        intercept: pipeline.model.intercept,
    };

    Ok(TrainingRun { pipeline, report })
}

/// Train, then persist the artifact at `path` (parent directories are created).
pub fn train_and_save(records: &[LeadRecord], config: &TrainConfig, path: &Path) -> Result<TrainingRun> {
    let run = train(records, config)?;
    save_artifact(path, &run.artifact())?;
    info!(path = %path.display(), "saved model artifact");
    Ok(run)
}

fn collect_labels(records: &[LeadRecord]) -> Result<Vec<bool>> {
    if records.is_empty() {
        return Err(LeadError::training("Training data is empty."));
    }
    records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            r.label.ok_or_else(|| {
                LeadError::schema(format!("record {}: missing required label `{LABEL_COLUMN}`", i + 1))
            })
        })
        .collect()
}
