//! Scoring: probability per lead → stable descending sort → priority tiers.
//!
//! Scoring is a pure function of the fitted pipeline and the batch. Rows are
//! scored in parallel; results are collected in input order before sorting, so
//! thread scheduling never affects the output.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::{LeadRecord, RankedLeadSet, ScoredLead};
use crate::error::{LeadError, Result};
use crate::io::ingest::LeadBatch;
use crate::pipeline::FittedPipeline;

pub mod tiers;

pub use tiers::assign_priorities;

/// Score a validated batch.
pub fn score_batch(pipeline: &FittedPipeline, batch: LeadBatch) -> Result<RankedLeadSet> {
    score_records(pipeline, batch.records, batch.columns)
}

/// Score records and build the ranked, tiered output.
///
/// Every record is validated before any scoring happens; one bad record fails
/// the batch. Categories unseen at training time are not an error.
pub fn score_records(pipeline: &FittedPipeline, records: Vec<LeadRecord>, columns: Vec<String>) -> Result<RankedLeadSet> {
    for (i, rec) in records.iter().enumerate() {
        rec.features
            .validate()
            .map_err(|e| LeadError::schema(format!("record {}: {e}", i + 1)))?;
    }

    let width = pipeline.encoder.width();
    let scored: Vec<(f64, usize)> = records
        .par_iter()
        .map_init(
            || vec![0.0; width],
            |buf, rec| {
                let unseen = pipeline.encoder.encode_into(&rec.features, buf);
                (pipeline.model.predict_proba(buf), unseen)
            },
        )
        .collect();

    let unseen_total: usize = scored.iter().map(|(_, u)| u).sum();
    if unseen_total > 0 {
        debug!(unseen_total, "categorical values not seen during training were encoded as zeros");
    }

    // Stable: equal scores keep input order.
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| scored[b].0.total_cmp(&scored[a].0));

    let sorted_scores: Vec<f64> = order.iter().map(|&i| scored[i].0).collect();
    let priorities = assign_priorities(&sorted_scores);

    let mut slots: Vec<Option<LeadRecord>> = records.into_iter().map(Some).collect();
    let mut leads = Vec::with_capacity(order.len());
    for (pos, (&idx, priority)) in order.iter().zip(priorities).enumerate() {
        let Some(record) = slots[idx].take() else {
            continue;
        };
        leads.push(ScoredLead {
            record,
            score: scored[idx].0,
            priority,
            rank: pos + 1,
        });
    }

    info!(leads = leads.len(), "scored batch");
    Ok(RankedLeadSet { columns, leads })
}
