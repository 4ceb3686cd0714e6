//! Train → persist → load → score → outreach, through the public API only.

use std::collections::BTreeSet;

use lead_scorer::data::{SampleConfig, generate_leads};
use lead_scorer::domain::{LeadRecord, Priority};
use lead_scorer::io::{LabelPolicy, load_artifact, read_leads_from, write_ranked_csv};
use lead_scorer::outreach::{DEFAULT_SUBJECT, DEFAULT_TEMPLATE, OutboxMessenger, Template, dispatch};
use lead_scorer::score::score_records;
use lead_scorer::train::{TrainConfig, train_and_save};

fn training_set() -> Vec<LeadRecord> {
    generate_leads(&SampleConfig {
        count: 100,
        positive_rate: 0.4,
        seed: 42,
    })
    .unwrap()
}

fn new_leads() -> Vec<LeadRecord> {
    let mut leads = generate_leads(&SampleConfig {
        count: 10,
        positive_rate: 0.0,
        seed: 2024,
    })
    .unwrap();
    leads[4].features.industry = "Aerospace".to_string();
    leads
}

#[test]
fn train_save_load_score() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("models/model.bin");

    let run = train_and_save(&training_set(), &TrainConfig::default(), &model_path).unwrap();
    assert!(run.report.auc.unwrap() > 0.5);
    assert_eq!(run.report.holdout_rows, 25);

    let artifact = load_artifact(&model_path).unwrap();
    assert_eq!(artifact.pipeline, run.pipeline);

    let ranked = score_records(&artifact.pipeline, new_leads(), vec![]).unwrap();
    assert_eq!(ranked.len(), 10);

    let labels: BTreeSet<&str> = Priority::ALL.iter().map(|p| p.label()).collect();
    for lead in &ranked.leads {
        assert!((0.0..=1.0).contains(&lead.score));
        assert!(labels.contains(lead.priority.label()));
    }
    for pair in ranked.leads.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    assert!(ranked.leads.iter().any(|l| l.record.features.industry == "Aerospace"));

    let again = score_records(&artifact.pipeline, new_leads(), vec![]).unwrap();
    assert_eq!(ranked, again);

    let csv_path = dir.path().join("ranked.csv");
    write_ranked_csv(&csv_path, &ranked).unwrap();
    let text = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(text.lines().count(), 11);
    assert!(text.lines().next().unwrap().ends_with(",score,priority"));
}

#[test]
fn corrupt_artifact_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.bin");
    std::fs::write(&path, b"definitely not a model").unwrap();
    let err = load_artifact(&path).unwrap_err();
    assert!(err.is_storage());
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn missing_numeric_value_is_schema_error() {
    let data = "industry,lead_source,region,employees,pages_visited,emails_opened,last_contact_days\n\
                SaaS,Ads,EU,10,2,1,3\n\
                Retail,Referral,NA,25,,0,7\n";
    let err = read_leads_from(data.as_bytes(), LabelPolicy::Optional).unwrap_err();
    assert!(err.is_schema());
    let msg = err.to_string();
    assert!(msg.contains("line 3"));
    assert!(msg.contains("pages_visited"));
}

#[test]
fn outreach_to_top_leads_writes_outbox() {
    let dir = tempfile::tempdir().unwrap();
    let run = train_and_save(&training_set(), &TrainConfig::default(), &dir.path().join("m.bin")).unwrap();
    let mut leads = new_leads();
    leads[0] = leads[0].clone().with_field("company", "");
    let ranked = score_records(&run.pipeline, leads, vec![]).unwrap();

    let outbox = dir.path().join("outbox");
    let messenger = OutboxMessenger::new(&outbox, "Lead Scorer", "sdr@example.com");
    let template = Template::parse(DEFAULT_TEMPLATE).unwrap();
    let report = dispatch(&ranked, 10, &template, DEFAULT_SUBJECT, &messenger);

    assert_eq!(report.attempted(), 10);
    assert_eq!(report.rendered, 9);
    assert_eq!(report.delivered, 9);
    assert_eq!(std::fs::read_dir(&outbox).unwrap().count(), 9);
}
