//! CSV ingest and validation.
//!
//! This module turns a leads CSV into typed [`LeadRecord`]s.
//!
//! Design goals:
//! - **Strict schema**: any missing column or malformed feature value fails the
//!   whole batch with the offending line and column (exit code 2). Nothing is
//!   skipped or coerced.
//! - **Passthrough**: every input column is kept, in order, as raw text.
//! - **Tolerant headers**: header names are trimmed, lowercased and stripped of
//!   a UTF-8 BOM before matching.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::debug;

use crate::domain::{LABEL_COLUMN, LeadRecord, feature_columns, parse_features, parse_label};
use crate::error::{LeadError, Result};

/// Whether the `converted` label column must be present and valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPolicy {
    /// Training input: label column and values are required.
    Required,
    /// Scoring input: the label is parsed when valid and otherwise ignored.
    Optional,
}

/// A validated batch of leads plus the input column order.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadBatch {
    pub columns: Vec<String>,
    pub records: Vec<LeadRecord>,
}

impl LeadBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when every record carries a conversion label.
    pub fn is_labeled(&self) -> bool {
        !self.records.is_empty() && self.records.iter().all(|r| r.label.is_some())
    }
}

/// Load and validate a leads CSV file.
pub fn read_leads(path: &Path, labels: LabelPolicy) -> Result<LeadBatch> {
    let file = File::open(path).map_err(|e| LeadError::io(path, e))?;
    let batch = read_leads_from(file, labels).map_err(|e| match e {
        LeadError::Schema { message } => LeadError::schema(format!("{}: {message}", path.display())),
        other => other,
    })?;
    debug!(path = %path.display(), rows = batch.len(), "loaded leads");
    Ok(batch)
}

/// Load and validate leads from any CSV source.
pub fn read_leads_from<R: Read>(source: R, labels: LabelPolicy) -> Result<LeadBatch> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| LeadError::schema(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let columns: Vec<String> = headers.iter().map(clean_header_name).collect();
    let keys: Vec<String> = columns.iter().map(|c| normalize_header_name(c)).collect();
    let header_map = build_header_map(&keys)?;

    ensure_required_columns_exist(&header_map, labels)?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and CSV lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| LeadError::schema(format!("line {line}: CSV parse error: {e}")))?;
        let lead = parse_row(&record, &keys, &header_map, labels)
            .map_err(|msg| LeadError::schema(format!("line {line}: {msg}")))?;
        records.push(lead);
    }

    Ok(LeadBatch { columns, records })
}

fn clean_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').trim().to_string()
}

/// Key used for column matching and record field lookup.
pub(crate) fn normalize_header_name(name: &str) -> String {
    clean_header_name(name).to_ascii_lowercase()
}

fn build_header_map(columns: &[String]) -> Result<HashMap<String, usize>> {
    let mut map = HashMap::with_capacity(columns.len());
    for (idx, name) in columns.iter().enumerate() {
        if map.insert(name.clone(), idx).is_some() {
            return Err(LeadError::schema(format!("Duplicate column: `{name}`")));
        }
    }
    Ok(map)
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>, labels: LabelPolicy) -> Result<()> {
    let mut missing: Vec<&str> = feature_columns().filter(|c| !header_map.contains_key(*c)).collect();
    if labels == LabelPolicy::Required && !header_map.contains_key(LABEL_COLUMN) {
        missing.push(LABEL_COLUMN);
    }
    if missing.is_empty() {
        return Ok(());
    }
    let list: Vec<String> = missing.iter().map(|c| format!("`{c}`")).collect();
    Err(LeadError::schema(format!("Missing required column(s): {}", list.join(", "))))
}

fn parse_row(
    record: &StringRecord,
    keys: &[String],
    header_map: &HashMap<String, usize>,
    labels: LabelPolicy,
) -> std::result::Result<LeadRecord, String> {
    let get = |name: &str| {
        let idx = header_map.get(name)?;
        // A short row is treated as empty trailing cells.
        Some(record.get(*idx).unwrap_or(""))
    };

    let features = parse_features(get)?;

    let label = match (labels, get(LABEL_COLUMN)) {
        (LabelPolicy::Required, Some(raw)) => Some(parse_label(raw)?),
        (LabelPolicy::Required, None) => return Err(format!("Missing required column: `{LABEL_COLUMN}`")),
        (LabelPolicy::Optional, Some(raw)) => parse_label(raw).ok(),
        (LabelPolicy::Optional, None) => None,
    };

    let fields = keys
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), record.get(i).unwrap_or("").to_string()))
        .collect();

    Ok(LeadRecord {
        features,
        label,
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "name,email,company,industry,lead_source,region,employees,pages_visited,emails_opened,last_contact_days,converted";

    fn csv(rows: &[&str]) -> String {
        let mut s = String::from(HEADER);
        for r in rows {
            s.push('\n');
            s.push_str(r);
        }
        s
    }

    #[test]
    fn reads_valid_rows_with_passthrough() {
        let data = csv(&[
            "Asha,asha@acme.io,Acme,SaaS,Webinar,APAC,120,7,3,2,1",
            "Ben,ben@globex.com,Globex,Retail,Ads,EU,40,1,0,30,0",
        ]);
        let batch = read_leads_from(data.as_bytes(), LabelPolicy::Required).unwrap();
        assert_eq!(batch.len(), 2);
        assert!(batch.is_labeled());
        assert_eq!(batch.columns.len(), 11);

        let first = &batch.records[0];
        assert_eq!(first.features.industry, "SaaS");
        assert_eq!(first.features.employees, 120.0);
        assert_eq!(first.label, Some(true));
        assert_eq!(first.email(), Some("asha@acme.io"));
        assert_eq!(first.field("company"), Some("Acme"));
    }

    #[test]
    fn headers_are_normalized() {
        let data = "\u{feff}Industry, Lead_Source ,REGION,employees,pages_visited,emails_opened,last_contact_days\nSaaS,Ads,EU,1,2,3,4";
        let batch = read_leads_from(data.as_bytes(), LabelPolicy::Optional).unwrap();
        assert_eq!(batch.columns[..3], ["Industry", "Lead_Source", "REGION"]);
        assert_eq!(batch.records[0].features.lead_source, "Ads");
        assert_eq!(batch.records[0].field("industry"), Some("SaaS"));
        assert_eq!(batch.records[0].label, None);
    }

    #[test]
    fn missing_column_fails_before_rows() {
        let data = "industry,lead_source,region,employees,emails_opened,last_contact_days\nSaaS,Ads,EU,1,3,4";
        let err = read_leads_from(data.as_bytes(), LabelPolicy::Optional).unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("`pages_visited`"));
    }

    #[test]
    fn training_requires_label_column() {
        let data = "industry,lead_source,region,employees,pages_visited,emails_opened,last_contact_days\nSaaS,Ads,EU,1,2,3,4";
        let err = read_leads_from(data.as_bytes(), LabelPolicy::Required).unwrap_err();
        assert!(err.to_string().contains("`converted`"));
    }

    #[test]
    fn malformed_numeric_fails_whole_batch() {
        let data = csv(&[
            "Asha,asha@acme.io,Acme,SaaS,Webinar,APAC,120,7,3,2,1",
            "Ben,ben@globex.com,Globex,Retail,Ads,EU,forty,1,0,30,0",
        ]);
        let err = read_leads_from(data.as_bytes(), LabelPolicy::Required).unwrap_err();
        assert!(err.is_schema());
        let msg = err.to_string();
        assert!(msg.contains("line 3"), "{msg}");
        assert!(msg.contains("employees"), "{msg}");
    }

    #[test]
    fn blank_numeric_cell_is_missing_value() {
        let data = csv(&["Asha,asha@acme.io,Acme,SaaS,Webinar,APAC,120,,3,2,1"]);
        let err = read_leads_from(data.as_bytes(), LabelPolicy::Optional).unwrap_err();
        assert!(err.to_string().contains("Missing required value: `pages_visited`"));
    }

    #[test]
    fn scoring_ignores_bad_label() {
        let data = csv(&["Asha,asha@acme.io,Acme,SaaS,Webinar,APAC,120,7,3,2,maybe"]);
        let batch = read_leads_from(data.as_bytes(), LabelPolicy::Optional).unwrap();
        assert_eq!(batch.records[0].label, None);
        assert!(!batch.is_labeled());
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let data = "industry,Industry,lead_source,region,employees,pages_visited,emails_opened,last_contact_days\n";
        assert!(read_leads_from(data.as_bytes(), LabelPolicy::Optional).is_err());
    }
}
