use anyhow::Result;
use clap::Parser;
use recordforge::config::PipelineConfig;
use recordforge::pipeline;
use recordforge::storage::LocalStorage;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Convert a CSV image manifest into sharded binary training records.
#[derive(Parser)]
#[command(name = "recordforge", version, about)]
struct Args {
    /// Path to the CSV manifest (the header line is skipped)
    manifest: PathBuf,

    /// Pipeline configuration file (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Also write the run summary as JSON to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let mut config = PipelineConfig::from_file(&args.config)?;
    config.csv_path = Some(args.manifest);

    let storage = LocalStorage::new();
    let summary = pipeline::run(&config, &storage)?;
    summary.print();
    if let Some(path) = args.summary {
        summary.save_to_file(path)?;
    }
    Ok(())
}
