//! FixTheGap trainer CLI
//!
//! Fits the salary model and writes its JSON artifacts.

use anyhow::{Context, Result};
use clap::Parser;
use fixthegap_trainer::{Dataset, LinearTrainer};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "fixthegap-train")]
#[command(author = "FixTheGap Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Least-squares salary model trainer for FixTheGap", long_about = None)]
struct Args {
    /// Input CSV dataset path (columns: experience, role, gender, salary)
    #[arg(short, long, default_value = "data/salaries.csv")]
    input: PathBuf,

    /// Output directory for the model artifacts
    #[arg(short, long, default_value = "models")]
    output: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("FixTheGap salary trainer v{}", env!("CARGO_PKG_VERSION"));

    info!("Loading dataset from: {}", args.input.display());
    let dataset = Dataset::from_csv(&args.input).context("Failed to load dataset")?;

    let stats = dataset.stats();
    info!(
        "Loaded {} rows ({} roles, {} genders)",
        stats.rows, stats.roles, stats.genders
    );
    info!(
        "Salary: min={:.2}, mean={:.2}, max={:.2}",
        stats.salary_min, stats.salary_mean, stats.salary_max
    );

    let outcome = LinearTrainer::new()
        .train(&dataset)
        .context("Training failed")?;
    let params = &outcome.artifacts.params;

    info!("Training complete");
    for (name, coef) in params.features.iter().zip(&params.coef) {
        info!("  {name}: {coef:.4}");
    }
    info!("  intercept: {:.4}", params.intercept);
    info!("  R²: {:.4}", outcome.r_squared);
    debug!("Gender classes: {:?}", outcome.artifacts.gender.classes());
    debug!("Role classes: {:?}", outcome.artifacts.role.classes());

    let written = outcome
        .artifacts
        .save(&args.output)
        .with_context(|| format!("Failed to write artifacts to {}", args.output.display()))?;

    info!("Model artifacts saved to: {}", args.output.display());
    for path in written {
        info!("  {}", path.display());
    }

    Ok(())
}
