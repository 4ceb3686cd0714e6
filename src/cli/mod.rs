//! Command-line parsing for the lead scorer.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! training/scoring code. Path options left unset fall back to `AppConfig`
//! (environment / `.env`).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::outreach::DEFAULT_SUBJECT;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "leads", version, about = "Lead scoring: train, rank, and reach out to prospects")]
pub struct Cli {
    /// Log format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Train on a labeled CSV, print the holdout evaluation, and save the model.
    Train(TrainArgs),
    /// Score a CSV with the saved model and print the ranking.
    Score(ScoreArgs),
    /// Score a CSV, then send templated outreach to the top leads.
    Send(SendArgs),
    /// Write a synthetic labeled leads CSV.
    Sample(SampleArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct TrainArgs {
    /// Labeled leads CSV (default: $DATA_PATH).
    #[arg(long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Where to save the model (default: $MODEL_PATH).
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Seed for the stratified holdout split.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fraction of rows held out for evaluation.
    #[arg(long, default_value_t = 0.25)]
    pub holdout: f64,

    /// Solver iteration limit.
    #[arg(long, default_value_t = 200)]
    pub max_iter: usize,

    /// Also write the training report as JSON.
    #[arg(long, value_name = "JSON")]
    pub report_json: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct ScoreArgs {
    /// Leads CSV to score (default: $DATA_PATH).
    #[arg(long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Saved model (default: $MODEL_PATH).
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Write the ranked leads (input columns + score + priority) to CSV.
    #[arg(short, long, value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Rows shown in the ranking table.
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// If no model exists and the CSV is labeled, train and save one first.
    #[arg(long)]
    pub quick_train: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct SendArgs {
    #[command(flatten)]
    pub score: ScoreArgs,

    /// Number of top-ranked leads to contact.
    #[arg(short = 'k', long, default_value_t = 10)]
    pub top_k: usize,

    /// Message template file with `{field}` placeholders (default: built-in).
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Subject line.
    #[arg(long, default_value_t = DEFAULT_SUBJECT.to_string())]
    pub subject: String,
}

#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Number of leads to generate.
    #[arg(short = 'n', long, default_value_t = 200)]
    pub count: usize,

    /// Fraction labeled converted.
    #[arg(long, default_value_t = 0.3)]
    pub positive_rate: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output CSV (default: $DATA_PATH).
    #[arg(short, long, value_name = "CSV")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_send_with_flattened_score_options() {
        let cli = Cli::parse_from([
            "leads", "-vv", "send", "--data", "in.csv", "--quick-train", "-k", "3", "--subject", "Hi",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Send(args) = cli.command else {
            panic!("expected send");
        };
        assert_eq!(args.score.data, Some(PathBuf::from("in.csv")));
        assert!(args.score.quick_train);
        assert_eq!(args.top_k, 3);
        assert_eq!(args.subject, "Hi");
        assert!(args.template.is_none());
    }

    #[test]
    fn train_defaults() {
        let cli = Cli::parse_from(["leads", "train", "--log-format", "json"]);
        assert_eq!(cli.log_format, LogFormat::Json);
        let Command::Train(args) = cli.command else {
            panic!("expected train");
        };
        assert_eq!(args.seed, 42);
        assert_eq!(args.max_iter, 200);
        assert!(args.data.is_none());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
