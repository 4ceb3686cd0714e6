//! Shared domain types.
//!
//! These types flow through every stage:
//!
//! - `LeadRecord` is produced by ingest (or built in code) and consumed by
//!   training and scoring
//! - `ScoredLead` / `RankedLeadSet` are the scoring output handed to exports,
//!   reports, and outreach

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::contract::{CATEGORICAL_FEATURES, LABEL_COLUMN, NUMERIC_FEATURES};

/// The modeled features of a single lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadFeatures {
    pub industry: String,
    pub lead_source: String,
    pub region: String,
    pub employees: f64,
    pub pages_visited: f64,
    pub emails_opened: f64,
    pub last_contact_days: f64,
}

impl LeadFeatures {
    /// Categorical values in `CATEGORICAL_FEATURES` order.
    pub fn categorical(&self) -> [&str; 3] {
        [&self.industry, &self.lead_source, &self.region]
    }

    /// Numeric values in `NUMERIC_FEATURES` order.
    pub fn numeric(&self) -> [f64; 4] {
        [
            self.employees,
            self.pages_visited,
            self.emails_opened,
            self.last_contact_days,
        ]
    }

    /// Check the typed values against the feature contract.
    ///
    /// Categorical values must be non-empty; numeric values must be finite and
    /// non-negative.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in CATEGORICAL_FEATURES.iter().zip(self.categorical()) {
            if value.trim().is_empty() {
                return Err(format!("Missing required value: `{name}`"));
            }
        }
        for (name, value) in NUMERIC_FEATURES.iter().zip(self.numeric()) {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "Invalid `{name}` value {value}: must be a finite, non-negative number"
                ));
            }
        }
        Ok(())
    }
}

/// One prospective customer.
///
/// `fields` keeps every input column as raw text in input order, so exports and
/// templates see exactly what was supplied. `features` is the typed view used
/// for modeling.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadRecord {
    pub features: LeadFeatures,
    /// Conversion label; only meaningful for training data.
    pub label: Option<bool>,
    pub fields: Vec<(String, String)>,
}

impl LeadRecord {
    /// Build a record from typed features. Feature columns are mirrored into `fields`.
    pub fn new(features: LeadFeatures) -> Self {
        let mut fields = Vec::with_capacity(CATEGORICAL_FEATURES.len() + NUMERIC_FEATURES.len());
        for (name, value) in CATEGORICAL_FEATURES.iter().zip(features.categorical()) {
            fields.push((name.to_string(), value.to_string()));
        }
        for (name, value) in NUMERIC_FEATURES.iter().zip(features.numeric()) {
            fields.push((name.to_string(), value.to_string()));
        }
        Self {
            features,
            label: None,
            fields,
        }
    }

    /// Set (or replace) a passthrough/display field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    /// Attach a conversion label (also mirrored into the `converted` column).
    pub fn with_label(mut self, converted: bool) -> Self {
        self.label = Some(converted);
        self.with_field(LABEL_COLUMN, if converted { "1" } else { "0" })
    }

    /// Look up a raw field value. Empty cells are treated as absent.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.field("name")
    }

    pub fn email(&self) -> Option<&str> {
        self.field("email")
    }

    pub fn company(&self) -> Option<&str> {
        self.field("company")
    }
}

/// Ordinal priority tier, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Very Low")]
    VeryLow,
    #[serde(rename = "Low")]
    Low,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "High")]
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl Priority {
    /// All tiers from lowest to highest.
    pub const ALL: [Priority; 5] = [
        Priority::VeryLow,
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::VeryHigh,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::VeryLow => "Very Low",
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::VeryHigh => "Very High",
        }
    }

    /// Tier for a 0-based bin index (clamped to the top tier).
    pub fn from_index(idx: usize) -> Self {
        Self::ALL[idx.min(Self::ALL.len() - 1)]
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A lead annotated by the scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredLead {
    pub record: LeadRecord,
    /// Predicted conversion probability in `[0, 1]`.
    pub score: f64,
    pub priority: Priority,
    /// 1-based position in the ranked output.
    pub rank: usize,
}

impl ScoredLead {
    /// Field name → value map used for template rendering.
    ///
    /// Contains every non-empty input field plus `score`, `priority` and `rank`.
    pub fn field_map(&self) -> BTreeMap<String, String> {
        let mut map: BTreeMap<String, String> = self
            .record
            .fields
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        map.insert("score".to_string(), format!("{:.4}", self.score));
        map.insert("priority".to_string(), self.priority.label().to_string());
        map.insert("rank".to_string(), self.rank.to_string());
        map
    }
}

/// Scoring output: every input lead, sorted by score descending.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankedLeadSet {
    /// Input column order (used for exports).
    pub columns: Vec<String>,
    pub leads: Vec<ScoredLead>,
}

impl RankedLeadSet {
    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    /// The `k` highest-scored leads (fewer if the batch is smaller).
    pub fn top(&self, k: usize) -> &[ScoredLead] {
        &self.leads[..k.min(self.leads.len())]
    }

    /// Lead counts per tier, highest tier first.
    pub fn priority_counts(&self) -> Vec<(Priority, usize)> {
        Priority::ALL
            .iter()
            .rev()
            .map(|&p| (p, self.leads.iter().filter(|l| l.priority == p).count()))
            .collect()
    }
}
