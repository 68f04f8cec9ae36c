//! Main application entry point (CLI binary).
//!
//! This is a thin pipeline host around the `metric_geoip` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Stage initialization from the TOML configuration
//! - Streaming newline-delimited JSON metrics through the stage
//!
//! All enrichment logic is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::process;

use metric_geoip::config::SAMPLE_CONFIG;
use metric_geoip::initialization::init_logger_with;
use metric_geoip::{run_json_lines, EnrichmentStage, HostOptions};

fn main() -> Result<()> {
    let opts = HostOptions::parse();

    if opts.sample_config {
        print!("{}", SAMPLE_CONFIG);
        return Ok(());
    }

    init_logger_with(opts.log_level.clone().into(), opts.log_format.clone())
        .context("Failed to initialize logger")?;

    let config = opts.load_config().context("Failed to load configuration")?;
    if let Err(e) = config.validate() {
        eprintln!("metric_geoip error: invalid configuration: {}", e);
        process::exit(1);
    }
    for warning in config.warnings() {
        log::warn!("{}", warning);
    }

    let stage = match EnrichmentStage::initialize(&config) {
        Ok(stage) => stage,
        Err(e) => {
            eprintln!("metric_geoip error: {:#}", anyhow::Error::from(e));
            process::exit(1);
        }
    };

    let input: Box<dyn BufRead> = match &opts.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open input {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let output = BufWriter::new(io::stdout().lock());

    let report = run_json_lines(&stage, input, output, opts.batch_size)?;
    log::info!(
        "Processed {} line{} in {} batch{} ({} malformed)",
        report.lines_read,
        if report.lines_read == 1 { "" } else { "s" },
        report.batches,
        if report.batches == 1 { "" } else { "es" },
        report.malformed_lines
    );
    stage.stats().log_summary();

    Ok(())
}
