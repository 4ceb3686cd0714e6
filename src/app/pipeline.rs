//! Shared workflows behind the CLI subcommands.
//!
//! Keeping these here keeps the handlers in `app` focused on presentation:
//! CSV → train → artifact, and CSV + artifact → ranked leads.

use std::path::Path;

use tracing::info;

use crate::domain::RankedLeadSet;
use crate::error::{LeadError, Result};
use crate::io::{LabelPolicy, load_artifact, read_leads};
use crate::pipeline::FittedPipeline;
use crate::score::score_batch;
use crate::train::{TrainConfig, TrainingReport, TrainingRun, train_and_save};

/// Outputs of a scoring run.
#[derive(Debug, Clone)]
pub struct ScoreOutput {
    pub ranked: RankedLeadSet,
    /// Set when a model had to be trained on the input first.
    pub quick_trained: Option<TrainingReport>,
}

/// Read a labeled CSV, train, and persist the artifact.
pub fn run_train(data: &Path, model_path: &Path, config: &TrainConfig) -> Result<TrainingRun> {
    let batch = read_leads(data, LabelPolicy::Required)?;
    info!(rows = batch.len(), data = %data.display(), "training");
    train_and_save(&batch.records, config, model_path)
}

/// Read a CSV and score it with the stored model.
///
/// With `quick_train`, a missing artifact is replaced by one trained on the
/// input itself, provided every row carries a label.
pub fn run_score(data: &Path, model_path: &Path, quick_train: bool) -> Result<ScoreOutput> {
    let batch = read_leads(data, LabelPolicy::Optional)?;

    let (pipeline, quick_trained) = if model_path.exists() || !quick_train {
        (load_pipeline(model_path)?, None)
    } else if batch.is_labeled() {
        info!(model = %model_path.display(), "no model found; training on the input");
        let run = train_and_save(&batch.records, &TrainConfig::default(), model_path)?;
        (run.pipeline, Some(run.report))
    } else {
        return Err(LeadError::storage(
            model_path,
            format!("no model found, and '{}' has no `converted` labels to train on", data.display()),
        ));
    };

    let ranked = score_batch(&pipeline, batch)?;
    Ok(ScoreOutput { ranked, quick_trained })
}

fn load_pipeline(model_path: &Path) -> Result<FittedPipeline> {
    let artifact = load_artifact(model_path)?;
    info!(trained_at = %artifact.trained_at, "loaded model");
    Ok(artifact.pipeline)
}
