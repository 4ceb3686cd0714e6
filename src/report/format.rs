//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the training/scoring code stays clean and testable
//! - output changes are localized

use crate::domain::RankedLeadSet;
use crate::outreach::{DispatchReport, Outcome};
use crate::report::priority_distribution;
use crate::train::{ClassMetrics, TrainingReport};

/// Format the training summary: data sizes, AUC, classification report, fit diagnostics.
pub fn format_training_report(report: &TrainingReport) -> String {
    let mut out = String::new();

    out.push_str("=== leads - Training Report ===\n");
    out.push_str(&format!("Trained at: {}\n", report.trained_at.format("%Y-%m-%d %H:%M:%S UTC")));
    out.push_str(&format!(
        "Rows: n={} | train={} | holdout={} | positive rate={:.1}%\n",
        report.rows,
        report.train_rows,
        report.holdout_rows,
        report.positive_rate * 100.0
    ));
    match report.auc {
        Some(auc) => out.push_str(&format!("Holdout AUC: {auc:.3}\n")),
        None => out.push_str("Holdout AUC: undefined (holdout has a single class)\n"),
    }

    let c = &report.classification;
    out.push_str(&format!("\nClassification report (threshold {:.2}):\n", c.threshold));
    out.push_str(
        format!("{:<14} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support").trim_end(),
    );
    out.push('\n');
    out.push_str(&metrics_row("0", &c.negative));
    out.push_str(&metrics_row("1", &c.positive));
    out.push_str(&format!(
        "{:<14} {:>9} {:>9} {:>9.2} {:>9}\n",
        "accuracy", "", "", c.accuracy, c.macro_avg.support
    ));
    out.push_str(&metrics_row("macro avg", &c.macro_avg));
    out.push_str(&metrics_row("weighted avg", &c.weighted_avg));

    out.push_str("\nFit:\n");
    out.push_str(&format!(
        "- solver: {} after {} iteration(s)\n",
        if report.converged { "converged" } else { "NOT converged" },
        report.iterations
    ));
    out.push_str(&format!("- intercept: {:.6}\n", report.intercept));
    for (name, coef) in &report.coefficients {
        out.push_str(&format!("- {:<28} {coef:>10.6}\n", truncate(name, 28)));
    }

    out
}

fn metrics_row(label: &str, m: &ClassMetrics) -> String {
    format!(
        "{:<14} {:>9.2} {:>9.2} {:>9.2} {:>9}\n",
        label, m.precision, m.recall, m.f1, m.support
    )
}

/// Format the top `top_n` ranked leads as a table.
pub fn format_rankings(ranked: &RankedLeadSet, top_n: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("Top {} of {} leads:\n", top_n.min(ranked.len()), ranked.len()));
    out.push_str(
        format!(
            "{:>5} {:<22} {:<22} {:<14} {:>7} {:<10}",
            "rank", "name", "company", "industry", "score", "priority"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:->5} {:-<22} {:-<22} {:-<14} {:->7} {:-<10}", "", "", "", "", "", "").trim_end());
    out.push('\n');

    for lead in ranked.top(top_n) {
        let rec = &lead.record;
        out.push_str(
            format!(
                "{:>5} {:<22} {:<22} {:<14} {:>7.4} {:<10}",
                lead.rank,
                truncate(rec.name().unwrap_or(""), 22),
                truncate(rec.company().unwrap_or(""), 22),
                truncate(&rec.features.industry, 14),
                lead.score,
                lead.priority.label(),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the tier distribution with ASCII bars scaled to `width` columns.
pub fn format_priority_distribution(ranked: &RankedLeadSet, width: usize) -> String {
    let buckets = priority_distribution(ranked);
    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0);

    let mut out = String::from("Priority distribution:\n");
    for b in &buckets {
        let bar = if max == 0 { 0 } else { (b.count * width).div_ceil(max) };
        out.push_str(
            format!(
                "{:<10} {:>5} {:>6.1}% {}",
                b.priority.label(),
                b.count,
                b.share * 100.0,
                "#".repeat(bar)
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Format the outreach summary plus one line per failed row.
pub fn format_dispatch_report(report: &DispatchReport) -> String {
    let mut out = String::new();
    if !report.configured {
        out.push_str("Messaging is not configured (set OUTBOX_DIR and SENDER_EMAIL); nothing was delivered.\n");
    }
    out.push_str(&format!(
        "Outreach: attempted={} rendered={} delivered={} failed={}\n",
        report.attempted(),
        report.rendered,
        report.delivered,
        report.failed()
    ));

    for row in report.rows.iter().filter(|r| r.outcome != Outcome::Delivered) {
        let reason = match &row.outcome {
            Outcome::Delivered => continue,
            Outcome::Rejected => "delivery failed".to_string(),
            Outcome::RenderFailed(missing) => missing.to_string(),
            Outcome::NoRecipient => "no email address".to_string(),
        };
        out.push_str(&format!(
            "  rank {:>4} {:<30} {reason}\n",
            row.rank,
            truncate(row.recipient.as_deref().unwrap_or("-"), 30)
        ));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LeadFeatures, LeadRecord, Priority, ScoredLead};
    use crate::outreach::RowOutcome;
    use crate::outreach::template::MissingFields;

    fn ranked(priorities: &[Priority]) -> RankedLeadSet {
        let leads = priorities
            .iter()
            .enumerate()
            .map(|(i, &priority)| ScoredLead {
                record: LeadRecord::new(LeadFeatures {
                    industry: "Healthcare".to_string(),
                    lead_source: "Referral".to_string(),
                    region: "NA".to_string(),
                    employees: 50.0,
                    pages_visited: 3.0,
                    emails_opened: 1.0,
                    last_contact_days: 4.0,
                })
                .with_field("name", format!("A very long lead name number {i}")),
                score: 0.9 - i as f64 * 0.1,
                priority,
                rank: i + 1,
            })
            .collect();
        RankedLeadSet { columns: vec![], leads }
    }

    #[test]
    fn distribution_lists_tiers_highest_first() {
        let set = ranked(&[Priority::VeryHigh, Priority::VeryHigh, Priority::Low, Priority::VeryLow]);
        let text = format_priority_distribution(&set, 10);
        let lines: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Very High"));
        assert!(lines[0].ends_with(&"#".repeat(10)));
        assert!(lines[2].starts_with("Medium"));
        assert!(!lines[2].contains('#'));
        assert!(lines[4].starts_with("Very Low"));
        assert!(lines[4].contains("25.0%"));
    }

    #[test]
    fn rankings_truncate_and_limit() {
        let set = ranked(&[Priority::High, Priority::Medium, Priority::Low]);
        let text = format_rankings(&set, 2);
        assert!(text.starts_with("Top 2 of 3 leads:"));
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("A very long lead name. "));
        assert!(text.contains("0.9000"));
    }

    #[test]
    fn dispatch_summary_lists_failures() {
        let report = DispatchReport {
            rows: vec![
                RowOutcome {
                    rank: 1,
                    recipient: Some("a@x.io".to_string()),
                    outcome: Outcome::Delivered,
                },
                RowOutcome {
                    rank: 2,
                    recipient: Some("b@x.io".to_string()),
                    outcome: Outcome::RenderFailed(MissingFields(vec!["company".to_string()])),
                },
            ],
            rendered: 1,
            delivered: 1,
            configured: true,
        };
        let text = format_dispatch_report(&report);
        assert!(text.starts_with("Outreach: attempted=2 rendered=1 delivered=1 failed=1"));
        assert!(text.contains("{company}"));
        assert!(!text.contains("a@x.io"));
    }
}
