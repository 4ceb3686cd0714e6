//! Synthetic labeled lead generation.
//!
//! Leads get a hidden propensity built from their features plus Gaussian noise;
//! the top `round(count · positive_rate)` by propensity are labeled converted.
//! The positive count is therefore exact and the labels carry real signal.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{LogNormal, Normal};

use crate::domain::{LeadFeatures, LeadRecord};
use crate::error::{LeadError, Result};

const INDUSTRIES: [(&str, f64); 6] = [
    ("SaaS", 0.8),
    ("Finance", 0.5),
    ("Healthcare", 0.3),
    ("Manufacturing", 0.0),
    ("Education", -0.3),
    ("Retail", -0.4),
];

const SOURCES: [(&str, f64); 5] = [
    ("Referral", 0.9),
    ("Webinar", 0.6),
    ("Organic", 0.2),
    ("Ads", -0.2),
    ("Cold Email", -0.6),
];

const REGIONS: [(&str, f64); 4] = [("NA", 0.2), ("EU", 0.1), ("APAC", 0.0), ("LATAM", -0.1)];

const FIRST_NAMES: [&str; 12] = [
    "Asha", "Ben", "Carla", "Dmitri", "Elena", "Farid", "Grace", "Hiro", "Ines", "Jonas", "Kemi", "Luis",
];
const LAST_NAMES: [&str; 10] = [
    "Patel", "Okafor", "Schmidt", "Nguyen", "Rossi", "Kowalski", "Silva", "Tanaka", "Haddad", "Moreau",
];
const COMPANY_PREFIXES: [&str; 8] = ["Acme", "Globex", "Initech", "Umbra", "Vertex", "Northwind", "Blue Fin", "Helio"];
const COMPANY_SUFFIXES: [&str; 4] = ["Labs", "Systems", "Group", "Works"];

/// Settings for [`generate_leads`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleConfig {
    pub count: usize,
    /// Fraction of leads labeled converted, in `[0, 1]`.
    pub positive_rate: f64,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            count: 200,
            positive_rate: 0.3,
            seed: 42,
        }
    }
}

/// Generate `count` labeled leads with display fields. Deterministic for a seed.
pub fn generate_leads(config: &SampleConfig) -> Result<Vec<LeadRecord>> {
    if config.count == 0 {
        return Err(LeadError::config("Sample count must be > 0."));
    }
    if !(0.0..=1.0).contains(&config.positive_rate) {
        return Err(LeadError::config("Positive rate must be within [0, 1]."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::<f64>::new(0.0, 0.75).map_err(|e| LeadError::config(format!("Noise distribution error: {e}")))?;
    let headcount =
        LogNormal::<f64>::new(4.0, 1.2).map_err(|e| LeadError::config(format!("Headcount distribution error: {e}")))?;

    let mut leads = Vec::with_capacity(config.count);
    let mut propensity = Vec::with_capacity(config.count);

    for i in 0..config.count {
        let (industry, w_industry) = *INDUSTRIES.choose(&mut rng).unwrap_or(&INDUSTRIES[0]);
        let (source, w_source) = *SOURCES.choose(&mut rng).unwrap_or(&SOURCES[0]);
        let (region, w_region) = *REGIONS.choose(&mut rng).unwrap_or(&REGIONS[0]);

        let employees = headcount.sample(&mut rng).round().clamp(1.0, 50_000.0);
        let pages_visited = rng.gen_range(0..=25) as f64;
        let emails_opened = rng.gen_range(0..=12) as f64;
        let last_contact_days = rng.gen_range(0..=90) as f64;

        let z = w_industry + w_source + w_region + 0.12 * pages_visited + 0.25 * emails_opened
            - 0.03 * last_contact_days
            + 0.15 * employees.ln()
            + noise.sample(&mut rng);
        propensity.push(z);

        let features = LeadFeatures {
            industry: industry.to_string(),
            lead_source: source.to_string(),
            region: region.to_string(),
            employees,
            pages_visited,
            emails_opened,
            last_contact_days,
        };

        let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
        let company = format!(
            "{} {}",
            COMPANY_PREFIXES[rng.gen_range(0..COMPANY_PREFIXES.len())],
            COMPANY_SUFFIXES[rng.gen_range(0..COMPANY_SUFFIXES.len())]
        );
        let domain: String = company.to_lowercase().chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        let email = format!("{}.{}{}@{domain}.com", first.to_lowercase(), last.to_lowercase(), i + 1);

        leads.push(
            LeadRecord::new(features)
                .with_field("name", format!("{first} {last}"))
                .with_field("email", email)
                .with_field("company", company),
        );
    }

    let positives = (config.count as f64 * config.positive_rate).round() as usize;
    let mut order: Vec<usize> = (0..config.count).collect();
    order.sort_by(|&a, &b| propensity[b].total_cmp(&propensity[a]));
    let mut labels = vec![false; config.count];
    for &i in &order[..positives] {
        labels[i] = true;
    }

    Ok(leads
        .into_iter()
        .zip(labels)
        .map(|(lead, converted)| lead.with_label(converted))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_positive_count_and_deterministic() {
        let cfg = SampleConfig {
            count: 50,
            positive_rate: 0.3,
            seed: 7,
        };
        let a = generate_leads(&cfg).unwrap();
        let b = generate_leads(&cfg).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
        assert_eq!(a.iter().filter(|r| r.label == Some(true)).count(), 15);
    }

    #[test]
    fn records_are_valid_and_have_display_fields() {
        let leads = generate_leads(&SampleConfig::default()).unwrap();
        for lead in &leads {
            lead.features.validate().unwrap();
            assert!(lead.name().is_some());
            assert!(lead.email().unwrap().contains('@'));
            assert!(lead.company().is_some());
            assert!(lead.field("converted").is_some());
        }
    }

    #[test]
    fn rejects_bad_settings() {
        let bad_count = SampleConfig {
            count: 0,
            ..SampleConfig::default()
        };
        assert!(generate_leads(&bad_count).is_err());
        let bad_rate = SampleConfig {
            positive_rate: 1.5,
            ..SampleConfig::default()
        };
        assert!(generate_leads(&bad_rate).is_err());
    }
}
