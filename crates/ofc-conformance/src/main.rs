//! ofc-conformance entry point.
//!
//! Loads an OFC driver the same way the plugin does (TOML config plus the
//! driver registry), runs the conformance checks against it and reports the
//! result on stdout. Logs go to stderr.

use anyhow::Context;
use clap::Parser;
use ofc_conformance::{run_all, ConformanceReport};
use ofc_driver::{DriverRegistry, OfcConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// OpenFlow controller driver conformance runner
#[derive(Parser, Debug)]
#[command(name = "ofc-conformance")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Driver config file (TOML); defaults apply when absent
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Driver name, overriding the config file
    #[arg(short = 'd', long)]
    driver: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "warn")]
    log_level: String,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn init_logging(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<OfcConfig> {
    let mut config = match &args.config {
        Some(path) => OfcConfig::load_or_default(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => OfcConfig::default(),
    };
    if let Some(driver) = &args.driver {
        config.driver = driver.clone();
    }
    Ok(config)
}

fn print_report(report: &ConformanceReport, json: bool) -> anyhow::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report).context("serializing report")?;
        println!("{}", out);
        return Ok(());
    }

    for check in &report.checks {
        match &check.error {
            None => println!("PASS  {:<26} {}", check.name, check.description),
            Some(e) => println!("FAIL  {:<26} {}", check.name, e),
        }
    }
    println!(
        "driver '{}': {} passed, {} failed",
        report.driver,
        report.passed_count(),
        report.failed_count()
    );
    Ok(())
}

fn run(args: &Args) -> anyhow::Result<bool> {
    let config = load_config(args)?;
    let registry = DriverRegistry::new();
    let driver = registry
        .load(&config)
        .with_context(|| format!("available drivers: {}", registry.names().join(", ")))?;

    info!("Running conformance checks against '{}'", driver.name());
    let report = run_all(driver.as_ref());
    print_report(&report, args.json)?;
    Ok(report.passed())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("ofc-conformance: {:#}", e);
            ExitCode::from(2)
        }
    }
}
