//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - resolves paths against `AppConfig`
//! - runs training / scoring / outreach
//! - prints reports and writes optional exports

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Command, LogFormat, SampleArgs, ScoreArgs, SendArgs, TrainArgs};
use crate::config::AppConfig;
use crate::data::{SampleConfig, generate_leads};
use crate::error::{LeadError, Result};
use crate::outreach::{DEFAULT_TEMPLATE, Template, dispatch, messenger_from_config};
use crate::train::TrainConfig;

pub mod pipeline;

const DISTRIBUTION_BAR_WIDTH: usize = 40;

/// Entry point for the `leads` binary.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);
    let config = AppConfig::from_env();

    match cli.command {
        Command::Train(args) => handle_train(args, &config),
        Command::Score(args) => handle_score(args, &config).map(|_| ()),
        Command::Send(args) => handle_send(args, &config),
        Command::Sample(args) => handle_sample(args, &config),
    }
}

/// Logs go to stderr so stdout stays clean for reports.
fn init_tracing(verbose: u8, format: LogFormat) {
    use tracing_subscriber::{EnvFilter, fmt};

    let default = match verbose {
        0 => "lead_scorer=info",
        1 => "lead_scorer=debug",
        _ => "lead_scorer=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    match format {
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => fmt().json().with_env_filter(filter).with_writer(std::io::stderr).init(),
    }
}

fn handle_train(args: TrainArgs, config: &AppConfig) -> Result<()> {
    if !(args.holdout > 0.0 && args.holdout < 1.0) {
        return Err(LeadError::config("--holdout must be strictly between 0 and 1."));
    }
    let train_config = TrainConfig {
        seed: args.seed,
        holdout_fraction: args.holdout,
        max_iter: args.max_iter,
        ..TrainConfig::default()
    };
    let data = args.data.unwrap_or_else(|| config.data_path.clone());
    let model = args.model.unwrap_or_else(|| config.model_path.clone());

    let run = pipeline::run_train(&data, &model, &train_config)?;
    println!("{}", crate::report::format_training_report(&run.report));
    println!("Model saved to {}", model.display());

    if let Some(path) = &args.report_json {
        crate::io::write_report_json(path, &run.report)?;
        info!(path = %path.display(), "wrote training report");
    }
    Ok(())
}

fn handle_score(args: ScoreArgs, config: &AppConfig) -> Result<pipeline::ScoreOutput> {
    let data = args.data.unwrap_or_else(|| config.data_path.clone());
    let model = args.model.unwrap_or_else(|| config.model_path.clone());

    let out = pipeline::run_score(&data, &model, args.quick_train)?;
    if let Some(report) = &out.quick_trained {
        println!("{}", crate::report::format_training_report(report));
        println!("Model saved to {}\n", model.display());
    }

    println!("{}", crate::report::format_rankings(&out.ranked, args.top));
    println!(
        "{}",
        crate::report::format_priority_distribution(&out.ranked, DISTRIBUTION_BAR_WIDTH)
    );

    if let Some(path) = &args.output {
        crate::io::write_ranked_csv(path, &out.ranked)?;
        println!("Ranked leads written to {}", path.display());
    }
    Ok(out)
}

fn handle_send(args: SendArgs, config: &AppConfig) -> Result<()> {
    // Parse the template before scoring so a bad file fails fast.
    let template = match &args.template {
        Some(path) => std::fs::read_to_string(path).map_err(|e| LeadError::io(path, e))?,
        None => DEFAULT_TEMPLATE.to_string(),
    };
    let template = Template::parse(&template).map_err(LeadError::config)?;

    let out = handle_score(args.score, config)?;
    let messenger = messenger_from_config(&config.outreach);
    let report = dispatch(&out.ranked, args.top_k, &template, &args.subject, messenger.as_ref());
    println!("{}", crate::report::format_dispatch_report(&report));
    Ok(())
}

fn handle_sample(args: SampleArgs, config: &AppConfig) -> Result<()> {
    let records = generate_leads(&SampleConfig {
        count: args.count,
        positive_rate: args.positive_rate,
        seed: args.seed,
    })?;
    let output: PathBuf = args.output.unwrap_or_else(|| config.data_path.clone());
    crate::io::write_leads_csv(&output, &[], &records)?;
    println!("Wrote {} synthetic leads to {}", records.len(), output.display());
    Ok(())
}
