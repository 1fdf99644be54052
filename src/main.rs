//! Price Chart OCR
//!
//! Reads the price legend off an Amazon product's CamelCamelCamel price
//! history chart and prints highest, lowest, current and average prices as
//! JSON.

mod analysis;
mod chart;
mod config;
mod ocr;
mod paths;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "price-chart-ocr")]
#[command(author, version, about = "Extracts prices from the CamelCamelCamel chart for an ASIN and prints JSON", long_about = None)]
struct Cli {
    /// Amazon product code (ASIN)
    #[arg(long)]
    asin: String,

    /// JSON config file (default: config.json next to the executable)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write the result, pretty-printed, to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Save each preprocessed chart image here for inspection
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };

    // stdout carries the JSON result, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())?;

    if let Some(dir) = &cli.debug_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create debug directory: {}", dir.display()))?;
    }

    let record = analysis::compute_price_record(&cli.asin, &config, cli.debug_dir.as_deref())?;

    if let Some(path) = &cli.output {
        analysis::export_to_json(&record, path)?;
        info!("Result saved: {}", path.display());
    }

    println!("{}", record.to_json()?);
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("ERRO: {:#}", e);
        std::process::exit(1);
    }
}
