//! Exports: ranked leads and plain lead files as CSV, training reports as JSON.
//!
//! CSV exports keep every input column in input order so they round-trip
//! through `ingest` and stay easy to consume in spreadsheets.

use std::fs::{File, create_dir_all};
use std::path::Path;

use crate::domain::{LeadRecord, RankedLeadSet};
use crate::error::{LeadError, Result};
use crate::io::ingest::normalize_header_name;
use crate::train::TrainingReport;

const SCORE_COLUMN: &str = "score";
const PRIORITY_COLUMN: &str = "priority";

/// Write the ranked set: input columns, then `score` and `priority`, best lead first.
pub fn write_ranked_csv(path: &Path, ranked: &RankedLeadSet) -> Result<()> {
    let records: Vec<&LeadRecord> = ranked.leads.iter().map(|l| &l.record).collect();
    let columns: Vec<String> = resolve_columns(&ranked.columns, &records)
        .into_iter()
        .filter(|c| {
            let key = normalize_header_name(c);
            key != SCORE_COLUMN && key != PRIORITY_COLUMN
        })
        .collect();

    let mut writer = csv::Writer::from_writer(create_file(path)?);
    let mut header = columns.clone();
    header.push(SCORE_COLUMN.to_string());
    header.push(PRIORITY_COLUMN.to_string());
    writer.write_record(&header)?;

    for lead in &ranked.leads {
        let mut row: Vec<String> = columns.iter().map(|c| cell(&lead.record, c)).collect();
        row.push(format!("{:.6}", lead.score));
        row.push(lead.priority.label().to_string());
        writer.write_record(&row)?;
    }
    writer.flush().map_err(|e| LeadError::io(path, e))?;
    Ok(())
}

/// Write records as a leads CSV (the format `ingest` reads).
///
/// Columns follow `columns` when given, otherwise the first record's field order.
pub fn write_leads_csv(path: &Path, columns: &[String], records: &[LeadRecord]) -> Result<()> {
    let refs: Vec<&LeadRecord> = records.iter().collect();
    let columns = resolve_columns(columns, &refs);

    let mut writer = csv::Writer::from_writer(create_file(path)?);
    writer.write_record(&columns)?;
    for rec in records {
        writer.write_record(columns.iter().map(|c| cell(rec, c)))?;
    }
    writer.flush().map_err(|e| LeadError::io(path, e))?;
    Ok(())
}

/// Write the training report as pretty JSON.
pub fn write_report_json(path: &Path, report: &TrainingReport) -> Result<()> {
    serde_json::to_writer_pretty(create_file(path)?, report)
        .map_err(|e| LeadError::io(path, std::io::Error::other(e)))
}

fn resolve_columns(columns: &[String], records: &[&LeadRecord]) -> Vec<String> {
    if !columns.is_empty() {
        return columns.to_vec();
    }
    records
        .first()
        .map(|r| r.fields.iter().map(|(k, _)| k.clone()).collect())
        .unwrap_or_default()
}

fn cell(record: &LeadRecord, column: &str) -> String {
    // Columns carry the input header text; fields are keyed by the normalized name.
    let key = normalize_header_name(column);
    record
        .fields
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.clone())
        .unwrap_or_default()
}

fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|e| LeadError::io(parent, e))?;
    }
    File::create(path).map_err(|e| LeadError::io(path, e))
}
