//! FixTheGap doctor CLI

use anyhow::Result;
use clap::Parser;
use fixthegap_doctor::{run, DoctorOptions};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about = "Diagnose why the FixTheGap service fails to start")]
struct Args {
    /// Workspace root to scan
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Model artifact directory (relative to the root)
    #[arg(long, default_value = "models")]
    model_dir: PathBuf,

    /// Reference salary CSV (relative to the root)
    #[arg(long, default_value = "data/ds_salaries.csv")]
    reference_data: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Exit with status 1 when any problem is found
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let options = DoctorOptions {
        root: args.root,
        model_dir: args.model_dir,
        reference_data: args.reference_data,
    };

    let report = run(&options)?;
    print!("{}", report.render());

    if args.strict && report.has_problems() {
        info!("Problems found in strict mode");
        std::process::exit(1);
    }

    Ok(())
}
