//! The feature contract: which columns the model consumes and how they parse.
//!
//! Ingest and the pipeline both go through these helpers so a malformed value is
//! reported the same way regardless of where the record came from.

use crate::domain::LeadFeatures;

pub const CATEGORICAL_FEATURES: [&str; 3] = ["industry", "lead_source", "region"];

pub const NUMERIC_FEATURES: [&str; 4] = ["employees", "pages_visited", "emails_opened", "last_contact_days"];

pub const LABEL_COLUMN: &str = "converted";

/// Display-only columns (optional, never modeled).
pub const DISPLAY_FIELDS: [&str; 3] = ["name", "email", "company"];

/// All modeled columns in encoding order.
pub fn feature_columns() -> impl Iterator<Item = &'static str> {
    CATEGORICAL_FEATURES.iter().chain(NUMERIC_FEATURES.iter()).copied()
}

/// Parse a numeric feature cell.
pub fn parse_numeric(name: &str, raw: &str) -> Result<f64, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(format!("Missing required value: `{name}`"));
    }
    let v = raw
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{name}` value '{raw}': expected a number"))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!(
            "Invalid `{name}` value '{raw}': must be a finite, non-negative number"
        ));
    }
    Ok(v)
}

/// Parse a categorical feature cell (any non-empty string).
pub fn parse_categorical(name: &str, raw: &str) -> Result<String, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(format!("Missing required value: `{name}`"));
    }
    Ok(raw.to_string())
}

/// Parse a `converted` label cell. Accepts `0`/`1` (and their float spellings).
pub fn parse_label(raw: &str) -> Result<bool, String> {
    let raw = raw.trim();
    match raw {
        "" => Err(format!("Missing required value: `{LABEL_COLUMN}`")),
        "1" => Ok(true),
        "0" => Ok(false),
        _ => match raw.parse::<f64>() {
            Ok(v) if v == 1.0 => Ok(true),
            Ok(v) if v == 0.0 => Ok(false),
            _ => Err(format!("Invalid `{LABEL_COLUMN}` value '{raw}': expected 0 or 1")),
        },
    }
}

/// Build typed features from a column lookup.
///
/// `get` returns the raw cell for a column name, or `None` when the column is
/// absent. The first problem found is returned.
pub fn parse_features<'a, F>(get: F) -> Result<LeadFeatures, String>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let cat = |name: &str| -> Result<String, String> {
        let raw = get(name).ok_or_else(|| format!("Missing required column: `{name}`"))?;
        parse_categorical(name, raw)
    };
    let num = |name: &str| -> Result<f64, String> {
        let raw = get(name).ok_or_else(|| format!("Missing required column: `{name}`"))?;
        parse_numeric(name, raw)
    };

    Ok(LeadFeatures {
        industry: cat("industry")?,
        lead_source: cat("lead_source")?,
        region: cat("region")?,
        employees: num("employees")?,
        pages_visited: num("pages_visited")?,
        emails_opened: num("emails_opened")?,
        last_contact_days: num("last_contact_days")?,
    })
}
